//! Combine the RSS flanking both sides of a D gene
use crate::rss::pairing::RssCandidate;
use crate::shared::{Strand, HEPTAMER_LENGTH};
use serde::{Deserialize, Serialize};

/// A D gene candidate: the D-left and D-right RSS around it.
//
// forward strand:  [nonamer][heptamer] DDDDDDDD [heptamer][nonamer]
//                   left_n   left_h             right_h   right_n
// on the reverse strand the D-right RSS sits on the left once remapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DCandidate {
    pub contig: usize,
    pub strand: Strand,
    pub left_heptamer: usize,
    pub left_nonamer: usize,
    pub right_heptamer: usize,
    pub right_nonamer: usize,
}

impl DCandidate {
    /// Heptamer positions (upstream, downstream) in forward coordinates
    pub fn flanking_heptamers(&self) -> (usize, usize) {
        match self.strand {
            Strand::Forward => (self.left_heptamer, self.right_heptamer),
            Strand::Reverse => (self.right_heptamer, self.left_heptamer),
        }
    }

    /// Forward interval strictly between the two heptamers
    pub fn gene_interval(&self) -> (usize, usize) {
        let (upstream, downstream) = self.flanking_heptamers();
        (upstream + HEPTAMER_LENGTH, downstream)
    }
}

/// Every (D-left, D-right) pair of one contig and strand such that
/// `up + 7 <= down` and `down - (up + 7) <= max_length`, with `up`/`down` the
/// upstream / downstream heptamers in forward coordinates.
pub fn combine_d_rss(
    d_left: &[RssCandidate],
    d_right: &[RssCandidate],
    strand: Strand,
    max_length: usize,
) -> Vec<DCandidate> {
    let mut result = Vec::new();
    for dr in d_right.iter().filter(|x| x.strand == strand) {
        for dl in d_left
            .iter()
            .filter(|x| x.strand == strand && x.contig == dr.contig)
        {
            let candidate = DCandidate {
                contig: dl.contig,
                strand,
                left_heptamer: dl.heptamer,
                left_nonamer: dl.nonamer,
                right_heptamer: dr.heptamer,
                right_nonamer: dr.nonamer,
            };
            let (upstream, downstream) = candidate.flanking_heptamers();
            if upstream + HEPTAMER_LENGTH <= downstream
                && downstream - (upstream + HEPTAMER_LENGTH) <= max_length
            {
                result.push(candidate);
            }
        }
    }
    result
}
