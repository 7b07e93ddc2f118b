//! Run the whole detection: RSS search on both strands, D joining, fragment
//! extraction, classification and gene coordinates.
use crate::genes::{
    align_fragments_to_genes, classify, extract_s_fragment, predict_d_gene, predict_vj_gene,
    AffineScheme, AlignmentStrategy, DPrediction, ExactRunScheme, GenePrediction, SFragment,
};
use crate::rss::{combine_d_rss, find_valid_motifs, pair_rss, DCandidate, MotifHits, RssCandidate};
use crate::shared::utils::{split_failures, thread_pool};
use crate::shared::{
    Contig, Dna, GeneType, LocusParameters, MotifLibrary, PipelineParameters, ReferenceLibrary,
    SignalType, Strand, TaskFailure, HEPTAMER_LENGTH, NONAMER_LENGTH,
};
use anyhow::{anyhow, Result};
use itertools::iproduct;
use log::{debug, info};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::collections::HashMap;

/// All RSS found in the contigs
#[derive(Default, Clone, Debug)]
pub struct RssCatalog {
    // forward strand first, then contigs in input order
    pub rss: HashMap<SignalType, Vec<RssCandidate>>,
    pub d_candidates: Vec<DCandidate>,
}

impl RssCatalog {
    pub fn get(&self, signal: SignalType) -> &[RssCandidate] {
        self.rss.get(&signal).map_or(&[], |v| v.as_slice())
    }
}

#[derive(Default, Clone, Debug)]
pub struct DetectionResult {
    pub catalog: RssCatalog,
    pub genes: HashMap<GeneType, Vec<GenePrediction>>,
    pub d_genes: Vec<DPrediction>,
    // tasks that could not be completed, the rest of the batch went on
    pub failures: Vec<TaskFailure>,
}

impl DetectionResult {
    pub fn predictions(&self, gene_type: GeneType) -> &[GenePrediction] {
        self.genes.get(&gene_type).map_or(&[], |v| v.as_slice())
    }
}

pub struct Detector {
    pub params: LocusParameters,
    pub pipeline: PipelineParameters,
    pub motifs: MotifLibrary,
    pub references: ReferenceLibrary,
    affine: Box<dyn AlignmentStrategy>,
    exact_run: Box<dyn AlignmentStrategy>,
    pool: ThreadPool,
}

impl Detector {
    /// Check the configuration and build the worker pool. Any missing
    /// parameter, motif table or reference set is an error here, before
    /// anything is scanned.
    pub fn new(
        params: LocusParameters,
        pipeline: PipelineParameters,
        motifs: MotifLibrary,
        references: ReferenceLibrary,
    ) -> Result<Detector> {
        params.validate()?;
        motifs.validate(&params)?;
        if !pipeline.rss_only {
            references.validate(&params)?;
        }
        let pool = thread_pool(pipeline.num_threads)?;
        Ok(Detector {
            params,
            pipeline,
            motifs,
            references,
            affine: Box::new(AffineScheme::default()),
            exact_run: Box::new(ExactRunScheme),
            pool,
        })
    }

    /// Replace the two alignment schemes
    pub fn with_strategies(
        mut self,
        affine: Box<dyn AlignmentStrategy>,
        exact_run: Box<dyn AlignmentStrategy>,
    ) -> Detector {
        self.affine = affine;
        self.exact_run = exact_run;
        self
    }

    pub fn run(&self, contigs: &[Contig]) -> Result<DetectionResult> {
        info!(
            "Finding immunoglobulin genes for locus {} in {} contigs",
            self.params.locus,
            contigs.len()
        );
        let catalog = self.find_rss(contigs)?;
        let mut result = DetectionResult {
            catalog,
            ..Default::default()
        };
        if self.pipeline.rss_only {
            return Ok(result);
        }

        for &gene_type in &self.params.gene_types {
            match gene_type {
                GeneType::D => {
                    let tasks = result.catalog.d_candidates.iter().map(|d| {
                        let contig = &contigs[d.contig];
                        (
                            format!("D candidate on contig {} ({} strand)", contig.id, d.strand),
                            predict_d_gene(contig, d),
                        )
                    });
                    result.d_genes = split_failures(tasks, &mut result.failures);
                    info!("{} D genes predicted", result.d_genes.len());
                }
                _ => {
                    let predictions = self.detect_vj(
                        gene_type,
                        contigs,
                        &result.catalog,
                        &mut result.failures,
                    )?;
                    info!("{} {} genes predicted", predictions.len(), gene_type);
                    result.genes.insert(gene_type, predictions);
                }
            }
        }
        Ok(result)
    }

    /// Scan both strands of every contig for all the needed signal types,
    /// pair the motifs and join the D RSS.
    pub fn find_rss(&self, contigs: &[Contig]) -> Result<RssCatalog> {
        let signals = self.params.signal_types();
        let strands: Vec<[Dna; 2]> = contigs
            .iter()
            .map(|c| [c.seq.clone(), c.seq.reverse_complement()])
            .collect();

        // one task per (signal, contig, strand, k)
        let scan_tasks: Vec<(SignalType, usize, Strand, usize)> = iproduct!(
            signals.iter().copied(),
            0..contigs.len(),
            Strand::BOTH,
            [HEPTAMER_LENGTH, NONAMER_LENGTH]
        )
        .collect();
        let scans: Vec<Result<MotifHits>> = self.pool.install(|| {
            scan_tasks
                .par_iter()
                .map(|&(signal, ci, strand, k)| -> Result<MotifHits> {
                    let kmers = self.motifs.get(signal)?.kmers(k)?;
                    Ok(find_valid_motifs(&strands[ci][strand_index(strand)].seq, kmers, k))
                })
                .collect()
        });
        let mut hits: HashMap<(SignalType, usize, Strand, usize), MotifHits> = HashMap::new();
        for (task, scan) in scan_tasks.into_iter().zip(scans) {
            hits.insert(task, scan?);
        }

        let mut catalog = RssCatalog::default();
        for &signal in &signals {
            let spacer = self.params.spacer(signal)?;
            let pair_tasks: Vec<(Strand, usize)> =
                iproduct!(Strand::BOTH, 0..contigs.len()).collect();
            let pairs: Vec<Vec<RssCandidate>> = self.pool.install(|| {
                pair_tasks
                    .par_iter()
                    .map(|&(strand, ci)| {
                        let empty = MotifHits::default();
                        let heptamers = hits
                            .get(&(signal, ci, strand, HEPTAMER_LENGTH))
                            .unwrap_or(&empty);
                        let nonamers = hits
                            .get(&(signal, ci, strand, NONAMER_LENGTH))
                            .unwrap_or(&empty);
                        pair_rss(
                            ci,
                            heptamers,
                            nonamers,
                            signal,
                            spacer,
                            strand,
                            contigs[ci].len(),
                        )
                    })
                    .collect()
            });
            let candidates: Vec<RssCandidate> = pairs.into_iter().flatten().collect();
            info!("{} candidate RSS for signal type {}", candidates.len(), signal);
            catalog.rss.insert(signal, candidates);
        }

        if self.params.gene_types.contains(&GeneType::D) {
            let max_length = self.params.gene_length(GeneType::D)?;
            for (strand, ci) in iproduct!(Strand::BOTH, 0..contigs.len()) {
                let on_contig = |signal| -> Vec<RssCandidate> {
                    catalog
                        .get(signal)
                        .iter()
                        .filter(|r| r.contig == ci && r.strand == strand)
                        .copied()
                        .collect()
                };
                let joined = combine_d_rss(
                    &on_contig(SignalType::DLeft),
                    &on_contig(SignalType::DRight),
                    strand,
                    max_length,
                );
                catalog.d_candidates.extend(joined);
            }
            info!("{} candidate D genes", catalog.d_candidates.len());
        }
        Ok(catalog)
    }

    /// Extract, align and classify the fragments next to the V or J RSS
    fn detect_vj(
        &self,
        gene_type: GeneType,
        contigs: &[Contig],
        catalog: &RssCatalog,
        failures: &mut Vec<TaskFailure>,
    ) -> Result<Vec<GenePrediction>> {
        let signal = match gene_type {
            GeneType::V => SignalType::V,
            GeneType::J => SignalType::J,
            GeneType::D => return Err(anyhow!("D genes are not classified by alignment")),
        };
        let length = self.params.gene_length(gene_type)?;
        let cutoffs = self.params.cutoffs(gene_type)?;
        let references = self.references.get(gene_type)?;

        let extracted: Vec<(String, Result<SFragment>)> = self.pool.install(|| {
            catalog
                .get(signal)
                .par_iter()
                .map(|rss| {
                    let contig = &contigs[rss.contig];
                    (
                        format!(
                            "{} RSS at {} on contig {} ({} strand)",
                            signal, rss.heptamer, contig.id, rss.strand
                        ),
                        extract_s_fragment(contig, rss, gene_type, length),
                    )
                })
                .collect()
        });
        let fragments: Vec<SFragment> = split_failures(extracted, failures);
        let nb_empty = fragments.iter().filter(|f| f.is_empty()).count();
        debug!(
            "{} {} fragments extracted ({} empty, replaced by filler)",
            fragments.len(),
            gene_type,
            nb_empty
        );

        let sequences: Vec<Dna> = fragments.iter().map(|f| f.seq.clone()).collect();
        let matrices = align_fragments_to_genes(
            &sequences,
            references,
            self.affine.as_ref(),
            self.exact_run.as_ref(),
            &self.pool,
        );
        let accepted = classify(&matrices, &cutoffs);
        debug!(
            "{} / {} {} fragments accepted",
            accepted.len(),
            fragments.len(),
            gene_type
        );

        let predictions = accepted.iter().map(|c| {
            let fragment = &fragments[c.fragment];
            let contig = &contigs[fragment.rss.contig];
            (
                format!(
                    "{} fragment {} of contig {} against {}",
                    gene_type, c.fragment, contig.id, references.genes[c.reference].name
                ),
                predict_vj_gene(contig, fragment, c, references),
            )
        });
        Ok(split_failures(predictions, failures))
    }
}

fn strand_index(strand: Strand) -> usize {
    match strand {
        Strand::Forward => 0,
        Strand::Reverse => 1,
    }
}
