//! Recombination signal sequences: motif scanning, heptamer/nonamer pairing
//! and D gene RSS joining

pub mod d_join;
pub mod pairing;
pub mod scanner;

pub use self::d_join::{combine_d_rss, DCandidate};
pub use self::pairing::{find_valid_rss, pair_rss, RssCandidate};
pub use self::scanner::{find_valid_motifs, MotifHits};
