//! Shared functionalities between the RSS search and the gene classification
pub mod gene;
pub mod parameters;
pub mod parser;
pub mod sequence;
pub mod utils;

pub use gene::{get_imgt_representation, ImgtRepresentation, ReferenceGene, ReferenceSet};
pub use parameters::{
    ClassificationCutoffs, GeneType, HeptamerFilter, Locus, LocusParameters, PipelineParameters,
    SignalType, HEPTAMER_LENGTH, NONAMER_LENGTH,
};
pub use parser::{KmerSet, MotifLibrary, MotifSet, ReferenceLibrary};
pub use sequence::{Contig, Dna, Strand};
pub use utils::TaskFailure;
