//! Score every fragment against every reference gene and keep the
//! fragments that look like a known gene
use crate::genes::alignment::{align_pair, AlignmentStrategy, PairStatistics};
use crate::shared::{ClassificationCutoffs, Dna, ReferenceSet};
use itertools::iproduct;
use log::debug;
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use rayon::ThreadPool;

#[cfg(feature = "kdam")]
use kdam::TqdmParallelIterator;

/// [fragment][reference] statistics of one gene type
#[derive(Clone, Debug)]
pub struct AlignmentMatrices {
    pub percent_identity: Array2<f64>,
    pub longest_run: Array2<usize>,
    pub pairs: Array2<PairStatistics>,
}

impl AlignmentMatrices {
    pub fn nb_fragments(&self) -> usize {
        self.pairs.dim().0
    }

    pub fn nb_references(&self) -> usize {
        self.pairs.dim().1
    }
}

/// Align all (fragment, reference) pairs on the worker pool. Results are
/// placed back by the index of their pair, not by completion order.
pub fn align_fragments_to_genes(
    fragments: &[Dna],
    references: &ReferenceSet,
    affine: &dyn AlignmentStrategy,
    exact_run: &dyn AlignmentStrategy,
    pool: &ThreadPool,
) -> AlignmentMatrices {
    let (n, m) = (fragments.len(), references.len());
    let tasks: Vec<(usize, usize)> = iproduct!(0..n, 0..m).collect();
    debug!(
        "Aligning {} fragments against {} references ({} / {} schemes)",
        n,
        m,
        affine.name(),
        exact_run.name()
    );

    let results: Vec<((usize, usize), PairStatistics)> = pool.install(|| {
        let iter = tasks.into_par_iter();
        #[cfg(feature = "kdam")]
        let iter = iter.tqdm();
        iter.map(|(i, j)| {
            (
                (i, j),
                align_pair(&fragments[i], &references.genes[j].seq, affine, exact_run),
            )
        })
        .collect()
    });

    let mut pairs = Array2::from_elem((n, m), PairStatistics::default());
    for ((i, j), stat) in results {
        pairs[[i, j]] = stat;
    }
    AlignmentMatrices {
        percent_identity: pairs.map(|p| p.percent_identity()),
        longest_run: pairs.map(|p| p.longest_run()),
        pairs,
    }
}

/// Index of the first maximum of a row
pub fn best_reference(row: ArrayView1<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in row.iter().enumerate() {
        match best {
            Some((_, b)) if value <= b => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Best reference of an accepted fragment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub fragment: usize,
    pub reference: usize,
    pub percent_identity: f64,
    pub longest_run: usize,
    pub statistics: PairStatistics,
}

/// Pick the best reference of each fragment (highest percent identity) and
/// keep the fragment if it passes the cutoffs. Rejected fragments are
/// dropped.
pub fn classify(
    matrices: &AlignmentMatrices,
    cutoffs: &ClassificationCutoffs,
) -> Vec<Classification> {
    let mut result = Vec::new();
    for (i, row) in matrices.percent_identity.outer_iter().enumerate() {
        let Some(j) = best_reference(row) else {
            continue;
        };
        let percent_identity = matrices.percent_identity[[i, j]];
        let longest_run = matrices.longest_run[[i, j]];
        if cutoffs.accept(percent_identity, longest_run) {
            result.push(Classification {
                fragment: i,
                reference: j,
                percent_identity,
                longest_run,
                statistics: matrices.pairs[[i, j]],
            });
        }
    }
    result
}
