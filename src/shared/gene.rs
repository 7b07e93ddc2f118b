//! Deal with reference gene names and gene representations
use crate::shared::parameters::{GeneType, Locus};
use crate::shared::sequence::Dna;
use anyhow::{anyhow, Result};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static IMGT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(TCRB|TCRA|TCRG|TCRD|TRB|TRA|IGH|IGK|IGL|TRG|TRD)",
        r"(V|D|J)([\w/]+)?(?:-([\w/-]*))?(?:\*(\d*))?",
    ))
    .expect("valid IMGT regex")
});

/// A canonical gene used as alignment target
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceGene {
    pub name: String,
    pub seq: Dna,
    // None when the name doesn't follow IMGT conventions
    pub imgt: Option<ImgtRepresentation>,
}

impl ReferenceGene {
    pub fn new(name: &str, seq: Dna) -> Result<ReferenceGene> {
        if seq.is_empty() {
            return Err(anyhow!("Reference gene {} has an empty sequence", name));
        }
        Ok(ReferenceGene {
            name: name.to_string(),
            seq,
            imgt: get_imgt_representation(name).ok(),
        })
    }
}

/// The ordered reference genes of one gene type. The position of a gene in
/// this list is its index in the alignment matrices.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSet {
    pub gene_type: Option<GeneType>,
    pub genes: Vec<ReferenceGene>,
}

impl ReferenceSet {
    pub fn new(gene_type: GeneType, genes: Vec<ReferenceGene>) -> Result<ReferenceSet> {
        if genes.is_empty() {
            return Err(anyhow!("No reference {} gene provided", gene_type));
        }
        Ok(ReferenceSet {
            gene_type: Some(gene_type),
            genes,
        })
    }

    /// Warn about genes whose name points to another locus or segment
    pub fn check_names(&self, locus: Locus) -> usize {
        let mut nb_suspicious = 0;
        for g in &self.genes {
            if let Some(imgt) = &g.imgt {
                let expected_type = self.gene_type.map(|x| x.to_string());
                if imgt.chain != locus.to_string() || Some(&imgt.gene_type) != expected_type.as_ref()
                {
                    warn!(
                        "Reference gene {} doesn't look like a {}{} gene",
                        g.name,
                        locus,
                        expected_type.unwrap_or_default()
                    );
                    nb_suspicious += 1;
                }
            }
        }
        nb_suspicious
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImgtRepresentation {
    // chain (TRA) and gene type (V) are mandatory
    pub chain: String,
    pub gene_type: String,
    // "family" part of the name, e.g. "1" in IGHV1-2*01
    pub gene_id: Option<String>,
    pub gene_position: Option<String>,
    pub allele_index: Option<i32>,
}

pub fn get_imgt_representation(name: &str) -> Result<ImgtRepresentation> {
    let g = IMGT_REGEX
        .captures(name)
        .ok_or(anyhow!("Gene {} does not have a valid name", name))?;

    // deal with the possibly weird convention for TCR names
    let chain = match g.get(1).map_or("", |m| m.as_str()) {
        "TCRB" => "TRB",
        "TCRA" => "TRA",
        "TCRG" => "TRG",
        "TCRD" => "TRD",
        c => c,
    };
    let gene_type = g.get(2).map_or("".to_string(), |m| m.as_str().to_string());
    let gene_id = g.get(3).map(|m| m.as_str().to_string());
    let gene_position = g.get(4).map(|m| m.as_str().to_string());
    let allele_index = g.get(5).and_then(|m| m.as_str().parse::<i32>().ok());

    Ok(ImgtRepresentation {
        chain: chain.to_string(),
        gene_type,
        gene_id,
        gene_position,
        allele_index,
    })
}
