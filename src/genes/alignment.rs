//! Alignment of candidate fragments against the reference genes
use crate::shared::{Dna, Strand};
use bio::alignment::{pairwise, Alignment, AlignmentOperation};
use serde::{Deserialize, Serialize};

pub type Scoring = pairwise::Scoring<Box<dyn Fn(u8, u8) -> i32>>;

/// Penalty large enough that no exact run can pay for a mismatch or a gap
const PROHIBITIVE: i32 = -10_000;

/// A scoring scheme under which a fragment (x) is aligned to a reference (y)
pub trait AlignmentStrategy: Send + Sync {
    fn scoring(&self) -> Scoring;
    fn name(&self) -> &'static str;
}

/// Similarity over the whole reference gene, with affine gaps. The fragment
/// ends can be skipped for free, the reference must be aligned end to end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffineScheme {
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl Default for AffineScheme {
    fn default() -> AffineScheme {
        AffineScheme {
            match_score: 5,
            mismatch_score: -4,
            gap_open: -10,
            gap_extend: -1,
        }
    }
}

impl AlignmentStrategy for AffineScheme {
    fn scoring(&self) -> Scoring {
        let (match_score, mismatch_score) = (self.match_score, self.mismatch_score);
        pairwise::Scoring {
            gap_open: self.gap_open,
            gap_extend: self.gap_extend,
            match_fn: Box::new(move |a: u8, b: u8| {
                if a == b {
                    match_score
                } else if (a == b'N') | (b == b'N') {
                    0i32
                } else {
                    mismatch_score
                }
            }),
            match_scores: None,
            xclip_prefix: 0,
            xclip_suffix: 0,
            yclip_prefix: pairwise::MIN_SCORE,
            yclip_suffix: pairwise::MIN_SCORE,
        }
    }

    fn name(&self) -> &'static str {
        "affine"
    }
}

/// Local alignment that only rewards uninterrupted identical bases, so the
/// optimal alignment is the longest common exact run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactRunScheme;

impl AlignmentStrategy for ExactRunScheme {
    fn scoring(&self) -> Scoring {
        pairwise::Scoring {
            gap_open: PROHIBITIVE,
            gap_extend: PROHIBITIVE,
            match_fn: Box::new(|a: u8, b: u8| if a == b { 1i32 } else { PROHIBITIVE }),
            match_scores: None,
            xclip_prefix: 0,
            xclip_suffix: 0,
            yclip_prefix: 0,
            yclip_suffix: 0,
        }
    }

    fn name(&self) -> &'static str {
        "exact-run"
    }
}

/// What is kept from one alignment
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentSummary {
    pub matches: usize,
    // aligned columns, clipped ends excluded
    pub span: usize,
    // aligned interval in the query, as it was aligned (so possibly on the
    // reverse complement, see `orientation`)
    pub query_start: usize,
    pub query_end: usize,
    pub query_len: usize,
    pub orientation: Option<Strand>,
}

impl AlignmentSummary {
    pub fn from_alignment(al: &Alignment, orientation: Strand) -> AlignmentSummary {
        let mut matches = 0;
        let mut span = 0;
        for op in &al.operations {
            match op {
                AlignmentOperation::Match => {
                    matches += 1;
                    span += 1;
                }
                AlignmentOperation::Subst | AlignmentOperation::Del | AlignmentOperation::Ins => {
                    span += 1
                }
                AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => {}
            }
        }
        AlignmentSummary {
            matches,
            span,
            query_start: al.xstart,
            query_end: al.xend,
            query_len: al.xlen,
            orientation: Some(orientation),
        }
    }

    pub fn percent_identity(&self) -> f64 {
        if self.span == 0 {
            return 0.;
        }
        100. * (self.matches as f64) / (self.span as f64)
    }

    /// Aligned interval expressed on the query as given (before any reverse complement)
    pub fn interval_on_query(&self) -> (usize, usize) {
        match self.orientation {
            Some(Strand::Reverse) => (
                self.query_len - self.query_end,
                self.query_len - self.query_start,
            ),
            _ => (self.query_start, self.query_end),
        }
    }
}

fn align_once(strategy: &dyn AlignmentStrategy, query: &[u8], reference: &[u8]) -> Alignment {
    let mut aligner = pairwise::Aligner::with_capacity_and_scoring(
        query.len(),
        reference.len(),
        strategy.scoring(),
    );
    aligner.custom(query, reference)
}

/// Align the query and its reverse complement, keep the one with more
/// matched bases (the query as given wins ties)
pub fn align_oriented(
    strategy: &dyn AlignmentStrategy,
    query: &Dna,
    reference: &Dna,
) -> AlignmentSummary {
    let fwd = AlignmentSummary::from_alignment(
        &align_once(strategy, &query.seq, &reference.seq),
        Strand::Forward,
    );
    let rc = query.reverse_complement();
    let rev = AlignmentSummary::from_alignment(
        &align_once(strategy, &rc.seq, &reference.seq),
        Strand::Reverse,
    );
    if rev.matches > fwd.matches {
        rev
    } else {
        fwd
    }
}

/// Statistics of one (fragment, reference) pair under both schemes
#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairStatistics {
    pub affine: AlignmentSummary,
    pub exact_run: AlignmentSummary,
    // true if the fragment was empty and replaced by a filler
    pub filler: bool,
}

impl PairStatistics {
    pub fn percent_identity(&self) -> f64 {
        self.affine.percent_identity()
    }

    pub fn longest_run(&self) -> usize {
        self.exact_run.span
    }
}

/// Nucleotide used to fill empty fragments
pub const FILLER_NUCLEOTIDE: u8 = b'A';

pub fn align_pair(
    fragment: &Dna,
    reference: &Dna,
    affine: &dyn AlignmentStrategy,
    exact_run: &dyn AlignmentStrategy,
) -> PairStatistics {
    let filler = fragment.is_empty();
    let filled;
    let query = if filler {
        filled = Dna::filler(FILLER_NUCLEOTIDE, reference.len());
        &filled
    } else {
        fragment
    };
    PairStatistics {
        affine: align_oriented(affine, query, reference),
        exact_run: align_oriented(exact_run, query, reference),
        filler,
    }
}
