//! Pair heptamers and nonamers separated by a spacer into RSS candidates
use crate::rss::scanner::MotifHits;
use crate::shared::{SignalType, Strand, HEPTAMER_LENGTH, NONAMER_LENGTH};
use serde::{Deserialize, Serialize};

/// An RSS found on one strand of a contig. Both indices are expressed in
/// forward-contig coordinates, whatever the strand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RssCandidate {
    pub contig: usize, // index of the contig in the input
    pub strand: Strand,
    pub signal: SignalType,
    pub heptamer: usize,
    pub nonamer: usize,
}

/// Return the (heptamer, nonamer) pairs for one contig, strand and signal
/// type. `heptamers` and `nonamers` are positions in the scanned frame (the
/// reverse complement for the reverse strand); the result is in forward
/// coordinates.
///
/// The first motif of the signal (heptamer for V / D-right, nonamer for J /
/// D-left) is paired with the second one if it starts `spacer`, `spacer - 1`
/// or `spacer + 1` bases after its end, in that order of preference, and at
/// most once.
pub fn find_valid_rss(
    heptamers: &MotifHits,
    nonamers: &MotifHits,
    signal: SignalType,
    spacer: usize,
    strand: Strand,
    seq_length: usize,
) -> Vec<(usize, usize)> {
    let (first_set, second_set, k_first) = if signal.heptamer_first() {
        (heptamers, nonamers, HEPTAMER_LENGTH)
    } else {
        (nonamers, heptamers, NONAMER_LENGTH)
    };

    let mut pairs = Vec::new();
    for &idx in first_set.positions() {
        let expected = idx + k_first + spacer;
        let found = [Some(expected), expected.checked_sub(1), Some(expected + 1)]
            .into_iter()
            .flatten()
            .find(|&p| second_set.contains(p));
        if let Some(second) = found {
            pairs.push((idx, second));
        }
    }

    pairs
        .into_iter()
        .map(|(first, second)| {
            // always heptamer first
            let (h, n) = if signal.heptamer_first() {
                (first, second)
            } else {
                (second, first)
            };
            (
                strand.to_forward(h, HEPTAMER_LENGTH, seq_length),
                strand.to_forward(n, NONAMER_LENGTH, seq_length),
            )
        })
        .collect()
}

/// Same as `find_valid_rss` but tagged with the contig / strand / signal
pub fn pair_rss(
    contig: usize,
    heptamers: &MotifHits,
    nonamers: &MotifHits,
    signal: SignalType,
    spacer: usize,
    strand: Strand,
    seq_length: usize,
) -> Vec<RssCandidate> {
    find_valid_rss(heptamers, nonamers, signal, spacer, strand, seq_length)
        .into_iter()
        .map(|(heptamer, nonamer)| RssCandidate {
            contig,
            strand,
            signal,
            heptamer,
            nonamer,
        })
        .collect()
}
