#![warn(clippy::large_types_passed_by_value)]

pub mod genes;
pub mod pipeline;
pub mod report;
pub mod rss;
pub mod shared;

pub use crate::pipeline::{DetectionResult, Detector, RssCatalog};

pub use crate::shared::{
    parser::load_data_dir, Contig, Dna, GeneType, Locus, LocusParameters, MotifLibrary, MotifSet,
    PipelineParameters, ReferenceLibrary, ReferenceSet, SignalType, Strand, TaskFailure,
};

pub use crate::genes::{
    AffineScheme, AlignmentStrategy, DPrediction, ExactRunScheme, GenePrediction,
};
pub use crate::rss::{DCandidate, RssCandidate};
