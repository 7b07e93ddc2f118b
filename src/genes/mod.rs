//! Candidate gene extraction, alignment-based classification and gene coordinates

pub mod alignment;
pub mod classifier;
pub mod coordinates;
pub mod fragment;

// Re-exporting for public API
pub use self::alignment::{
    align_oriented, align_pair, AffineScheme, AlignmentStrategy, AlignmentSummary,
    ExactRunScheme, PairStatistics,
};
pub use self::classifier::{
    align_fragments_to_genes, best_reference, classify, AlignmentMatrices, Classification,
};
pub use self::coordinates::{
    map_d_coordinates, map_vj_coordinates, predict_d_gene, predict_vj_gene, DPrediction,
    GeneCoordinates, GenePrediction,
};
pub use self::fragment::{extract_d_gene, extract_s_fragment, SFragment};
