//! The structs used for specifying the parameters of a run
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Length of the heptamer part of an RSS
pub const HEPTAMER_LENGTH: usize = 7;
/// Length of the nonamer part of an RSS
pub const NONAMER_LENGTH: usize = 9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeneType {
    V,
    D,
    J,
}

impl GeneType {
    /// The RSS flanking this gene segment
    pub fn signal_types(&self) -> Vec<SignalType> {
        match self {
            GeneType::V => vec![SignalType::V],
            GeneType::J => vec![SignalType::J],
            GeneType::D => vec![SignalType::DLeft, SignalType::DRight],
        }
    }
}

impl fmt::Display for GeneType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GeneType::V => write!(f, "V"),
            GeneType::D => write!(f, "D"),
            GeneType::J => write!(f, "J"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignalType {
    V,
    J,
    #[serde(rename = "D_left")]
    DLeft,
    #[serde(rename = "D_right")]
    DRight,
}

impl SignalType {
    pub const ALL: [SignalType; 4] = [
        SignalType::V,
        SignalType::J,
        SignalType::DLeft,
        SignalType::DRight,
    ];

    /// True if the heptamer comes before the nonamer when read on the scanned strand
    pub fn heptamer_first(&self) -> bool {
        matches!(self, SignalType::V | SignalType::DRight)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SignalType::V => "V",
            SignalType::J => "J",
            SignalType::DLeft => "D_left",
            SignalType::DRight => "D_right",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SignalType {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        SignalType::ALL
            .into_iter()
            .find(|st| st.name() == s)
            .ok_or(anyhow!("Unknown signal type {}", s))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locus {
    IGH,
    IGK,
    IGL,
    TRA,
    TRB,
    TRD,
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Locus {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "IGH" => Ok(Locus::IGH),
            "IGK" => Ok(Locus::IGK),
            "IGL" => Ok(Locus::IGL),
            "TRA" => Ok(Locus::TRA),
            "TRB" => Ok(Locus::TRB),
            "TRD" => Ok(Locus::TRD),
            _ => Err(anyhow!(
                "Unsupported locus {} (IGH, IGK, IGL, TRA, TRB or TRD)",
                s
            )),
        }
    }
}

/// Accept/reject thresholds of the alignment-based classification
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationCutoffs {
    // a fragment is always accepted above this percent identity
    pub strict: f64,
    // ... and above this one if its longest exact run reaches `run`
    pub relax: f64,
    pub run: usize,
}

impl ClassificationCutoffs {
    pub fn new(strict: f64, relax: f64, run: usize) -> Self {
        Self { strict, relax, run }
    }

    pub fn accept(&self, percent_identity: f64, longest_run: usize) -> bool {
        percent_identity >= self.strict
            || (percent_identity >= self.relax && longest_run >= self.run)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocusParameters {
    pub locus: Locus,
    // spacer length between heptamer and nonamer, +/- 1
    pub spacer_lengths: HashMap<SignalType, usize>,
    // expected length of V and J genes, maximal length of D genes
    pub gene_lengths: HashMap<GeneType, usize>,
    // gene segments to look for, in report order
    pub gene_types: Vec<GeneType>,
    pub cutoffs: HashMap<GeneType, ClassificationCutoffs>,
}

impl Default for LocusParameters {
    fn default() -> LocusParameters {
        LocusParameters::for_locus(Locus::IGH)
    }
}

impl LocusParameters {
    pub fn for_locus(locus: Locus) -> LocusParameters {
        use GeneType::{D, J, V};
        use SignalType::{DLeft, DRight};
        let (spacers, gene_types): (Vec<(SignalType, usize)>, Vec<GeneType>) = match locus {
            Locus::IGH => (
                vec![(SignalType::V, 23), (DLeft, 12), (DRight, 12), (SignalType::J, 23)],
                vec![V, D, J],
            ),
            Locus::IGK => (
                vec![(SignalType::V, 12), (DLeft, 23), (DRight, 12), (SignalType::J, 23)],
                vec![V, J],
            ),
            Locus::IGL => (
                vec![(SignalType::V, 23), (DLeft, 12), (DRight, 23), (SignalType::J, 12)],
                vec![V, J],
            ),
            Locus::TRA => (vec![(SignalType::V, 23), (SignalType::J, 12)], vec![V, J]),
            Locus::TRB | Locus::TRD => (
                vec![(SignalType::V, 23), (DLeft, 12), (DRight, 23), (SignalType::J, 12)],
                vec![V, D, J],
            ),
        };

        LocusParameters {
            locus,
            spacer_lengths: spacers.into_iter().collect(),
            gene_lengths: HashMap::from([(V, 350), (J, 70), (D, 150)]),
            gene_types,
            cutoffs: HashMap::from([
                (V, ClassificationCutoffs::new(70., 60., 15)),
                (J, ClassificationCutoffs::new(70., 65., 11)),
            ]),
        }
    }

    /// Only look for the gene types listed in `genes` (e.g. "vj", "D")
    pub fn restrict_gene_types(&mut self, genes: &str) -> Result<()> {
        let mut requested = Vec::new();
        for c in genes.chars() {
            let gt = match c.to_ascii_uppercase() {
                'V' => GeneType::V,
                'D' => GeneType::D,
                'J' => GeneType::J,
                _ => return Err(anyhow!("Invalid gene type '{}' in {}", c, genes)),
            };
            if !self.gene_types.contains(&gt) {
                return Err(anyhow!(
                    "Locus {} has no {} gene segment",
                    self.locus,
                    gt
                ));
            }
            if !requested.contains(&gt) {
                requested.push(gt);
            }
        }
        if requested.is_empty() {
            return Err(anyhow!("No gene type requested"));
        }
        // keep the locus ordering
        self.gene_types.retain(|g| requested.contains(g));
        Ok(())
    }

    /// Signal types that need to be scanned for the selected gene types
    pub fn signal_types(&self) -> Vec<SignalType> {
        let mut result = Vec::new();
        for gt in [GeneType::V, GeneType::J, GeneType::D] {
            if self.gene_types.contains(&gt) {
                result.extend(gt.signal_types());
            }
        }
        result
    }

    pub fn spacer(&self, signal: SignalType) -> Result<usize> {
        self.spacer_lengths
            .get(&signal)
            .copied()
            .ok_or(anyhow!("No spacer length for {} in locus {}", signal, self.locus))
    }

    pub fn gene_length(&self, gene: GeneType) -> Result<usize> {
        self.gene_lengths
            .get(&gene)
            .copied()
            .ok_or(anyhow!("No gene length for {} in locus {}", gene, self.locus))
    }

    pub fn cutoffs(&self, gene: GeneType) -> Result<ClassificationCutoffs> {
        self.cutoffs
            .get(&gene)
            .copied()
            .ok_or(anyhow!("No classification cutoffs for {} genes", gene))
    }

    /// Check that every selected gene type is fully parameterized
    pub fn validate(&self) -> Result<()> {
        for st in self.signal_types() {
            self.spacer(st)?;
        }
        for &gt in &self.gene_types {
            self.gene_length(gt)?;
            if gt != GeneType::D {
                self.cutoffs(gt)?;
            }
        }
        Ok(())
    }
}

/// Filter applied to the heptamer positions of the RSS report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeptamerFilter {
    pub min_heptamer: Option<usize>,
    // minimal distance between the heptamer and the end of the contig
    pub max_heptamer: Option<usize>,
}

impl HeptamerFilter {
    pub fn accept(&self, heptamer: usize, contig_length: usize) -> bool {
        if let Some(min) = self.min_heptamer {
            if heptamer < min {
                return false;
            }
        }
        if let Some(max) = self.max_heptamer {
            if contig_length.saturating_sub(heptamer) < max {
                return false;
            }
        }
        true
    }
}

#[derive(Clone, Debug)]
pub struct PipelineParameters {
    // size of the worker pool
    pub num_threads: usize,
    // stop after the RSS search
    pub rss_only: bool,
    pub heptamer_filter: HeptamerFilter,
}

impl Default for PipelineParameters {
    fn default() -> PipelineParameters {
        PipelineParameters {
            num_threads: 1,
            rss_only: false,
            heptamer_filter: HeptamerFilter::default(),
        }
    }
}

impl PipelineParameters {
    pub fn new(num_threads: usize, rss_only: bool) -> Self {
        Self {
            num_threads,
            rss_only,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tra_has_no_d_signal() {
        let params = LocusParameters::for_locus(Locus::TRA);
        assert!(params.spacer(SignalType::DLeft).is_err());
        assert_eq!(params.signal_types(), vec![SignalType::V, SignalType::J]);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn restrict_gene_types() {
        let mut params = LocusParameters::for_locus(Locus::IGH);
        params.restrict_gene_types("jd").unwrap();
        assert_eq!(params.gene_types, vec![GeneType::D, GeneType::J]);
        assert_eq!(
            params.signal_types(),
            vec![SignalType::J, SignalType::DLeft, SignalType::DRight]
        );

        let mut params = LocusParameters::for_locus(Locus::IGK);
        assert!(params.restrict_gene_types("d").is_err());
        assert!(params.restrict_gene_types("x").is_err());
    }

    #[test]
    fn heptamer_filter_uses_contig_length() {
        let filter = HeptamerFilter {
            min_heptamer: Some(10),
            max_heptamer: Some(20),
        };
        assert!(!filter.accept(5, 100));
        assert!(filter.accept(10, 100));
        assert!(filter.accept(80, 100));
        assert!(!filter.accept(81, 100));
    }
}
