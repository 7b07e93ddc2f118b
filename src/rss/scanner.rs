//! Exact search of the valid heptamers / nonamers in a sequence
use crate::shared::KmerSet;
use nohash_hasher::IntSet;

/// Start positions of valid k-mers in one scanned sequence
#[derive(Default, Clone, Debug)]
pub struct MotifHits {
    // sorted, no duplicates
    positions: Vec<usize>,
    lookup: IntSet<usize>,
}

impl MotifHits {
    pub fn from_positions(mut positions: Vec<usize>) -> MotifHits {
        positions.sort_unstable();
        positions.dedup();
        let lookup = positions.iter().copied().collect();
        MotifHits { positions, lookup }
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.lookup.contains(&pos)
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Find every `i` such that `seq[i..i+k]`, upper-cased, belongs to `motifs`.
/// Sequences shorter than `k` have no hit.
pub fn find_valid_motifs(seq: &[u8], motifs: &KmerSet, k: usize) -> MotifHits {
    if k == 0 || seq.len() < k {
        return MotifHits::default();
    }
    let upper = seq.to_ascii_uppercase();
    let positions = upper
        .windows(k)
        .enumerate()
        .filter_map(|(i, w)| if motifs.contains(w) { Some(i) } else { None })
        .collect();
    MotifHits::from_positions(positions)
}
