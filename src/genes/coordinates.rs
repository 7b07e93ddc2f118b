//! Convert RSS / fragment coordinates into gene coordinates on the contig
use crate::genes::classifier::Classification;
use crate::genes::fragment::{extract_d_gene, SFragment};
use crate::rss::DCandidate;
use crate::shared::{
    Contig, Dna, GeneType, ReferenceSet, Strand, HEPTAMER_LENGTH, NONAMER_LENGTH,
};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// 0-based, inclusive gene boundaries in forward-contig coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneCoordinates {
    pub start: usize,
    pub end: usize,
}

/// Gene boundaries of a V or J fragment given the aligned interval
/// `[qs, qe)` of the (gene-oriented) fragment.
pub fn map_vj_coordinates(
    fragment: &SFragment,
    interval: (usize, usize),
    contig_length: usize,
) -> Result<GeneCoordinates> {
    let (qs, qe) = interval;
    if qs >= qe || qe > fragment.len() {
        return Err(anyhow!(
            "Aligned interval [{}, {}) outside of a fragment of length {}",
            qs,
            qe,
            fragment.len()
        ));
    }
    let h = fragment.rss.heptamer;
    let coordinates = match (fragment.gene_type, fragment.rss.strand) {
        // gene ends right before the heptamer
        (GeneType::V, Strand::Forward) => GeneCoordinates {
            start: fragment.start + qs,
            end: h - 1,
        },
        (GeneType::V, Strand::Reverse) => GeneCoordinates {
            start: h + HEPTAMER_LENGTH,
            end: fragment.end() - qs - 1,
        },
        (GeneType::J, Strand::Forward) => GeneCoordinates {
            start: h + HEPTAMER_LENGTH,
            end: h + HEPTAMER_LENGTH + qe - 1,
        },
        (GeneType::J, Strand::Reverse) => GeneCoordinates {
            start: h - qe,
            end: h - 1,
        },
        (GeneType::D, _) => return Err(anyhow!("D genes are not aligned")),
    };
    check_bounds(coordinates, contig_length)?;
    Ok(coordinates)
}

/// D gene boundaries: between the two flanking heptamers
pub fn map_d_coordinates(d: &DCandidate, contig_length: usize) -> Result<GeneCoordinates> {
    let (upstream, downstream) = d.flanking_heptamers();
    let coordinates = GeneCoordinates {
        start: upstream + HEPTAMER_LENGTH,
        end: downstream
            .checked_sub(1)
            .ok_or(anyhow!("Heptamer at the start of the contig"))?,
    };
    // an empty D gene has end == start - 1
    if coordinates.start > coordinates.end + 1 || downstream > contig_length {
        return Err(anyhow!(
            "Invalid D gene boundaries [{}, {}] on a contig of length {}",
            coordinates.start,
            coordinates.end,
            contig_length
        ));
    }
    Ok(coordinates)
}

fn check_bounds(c: GeneCoordinates, contig_length: usize) -> Result<()> {
    if c.start > c.end || c.end >= contig_length {
        return Err(anyhow!(
            "Invalid gene boundaries [{}, {}] on a contig of length {}",
            c.start,
            c.end,
            contig_length
        ));
    }
    Ok(())
}

/// A V or J gene found next to an RSS
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenePrediction {
    pub contig_id: String,
    pub strand: Strand,
    pub heptamer_index: usize,
    pub nonamer_index: usize,
    pub heptamer: Dna,
    pub nonamer: Dna,
    pub gene_start: usize,
    pub gene_end: usize,
    pub reference_id: String,
    // orientation of the fragment in its best alignment
    pub alignment_direction: Strand,
    pub percent_identity: f64,
    pub longest_run: usize,
    pub sequence: Dna,
}

/// A D gene found between two RSS
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DPrediction {
    pub contig_id: String,
    pub strand: Strand,
    pub left_heptamer_index: usize,
    pub left_nonamer_index: usize,
    pub left_heptamer: Dna,
    pub left_nonamer: Dna,
    pub right_heptamer_index: usize,
    pub right_nonamer_index: usize,
    pub right_heptamer: Dna,
    pub right_nonamer: Dna,
    pub gene_start: usize,
    pub gene_end: usize,
    pub sequence: Dna,
}

pub fn predict_vj_gene(
    contig: &Contig,
    fragment: &SFragment,
    classification: &Classification,
    references: &ReferenceSet,
) -> Result<GenePrediction> {
    let affine = &classification.statistics.affine;
    let (qs, qe) = affine.interval_on_query();
    let coordinates = map_vj_coordinates(fragment, (qs, qe), contig.len())?;
    let reference = references
        .genes
        .get(classification.reference)
        .ok_or(anyhow!("No reference gene {}", classification.reference))?;

    // the gene goes up to the RSS, the aligned part only bounds the other end
    let sequence = match fragment.gene_type {
        GeneType::V => fragment.seq.extract_subsequence(qs, fragment.len()),
        _ => fragment.seq.extract_subsequence(0, qe),
    };

    let strand = fragment.rss.strand;
    Ok(GenePrediction {
        contig_id: contig.id.clone(),
        strand,
        heptamer_index: fragment.rss.heptamer,
        nonamer_index: fragment.rss.nonamer,
        heptamer: contig
            .seq
            .motif_on_strand(fragment.rss.heptamer, HEPTAMER_LENGTH, strand)?,
        nonamer: contig
            .seq
            .motif_on_strand(fragment.rss.nonamer, NONAMER_LENGTH, strand)?,
        gene_start: coordinates.start,
        gene_end: coordinates.end,
        reference_id: reference.name.clone(),
        alignment_direction: affine.orientation.unwrap_or(Strand::Forward),
        percent_identity: classification.percent_identity,
        longest_run: classification.longest_run,
        sequence,
    })
}

pub fn predict_d_gene(contig: &Contig, d: &DCandidate) -> Result<DPrediction> {
    let coordinates = map_d_coordinates(d, contig.len())
        .with_context(|| format!("D gene of contig {} ({} strand)", contig.id, d.strand))?;
    let motif = |pos, k| contig.seq.motif_on_strand(pos, k, d.strand);
    Ok(DPrediction {
        contig_id: contig.id.clone(),
        strand: d.strand,
        left_heptamer_index: d.left_heptamer,
        left_nonamer_index: d.left_nonamer,
        left_heptamer: motif(d.left_heptamer, HEPTAMER_LENGTH)?,
        left_nonamer: motif(d.left_nonamer, NONAMER_LENGTH)?,
        right_heptamer_index: d.right_heptamer,
        right_nonamer_index: d.right_nonamer,
        right_heptamer: motif(d.right_heptamer, HEPTAMER_LENGTH)?,
        right_nonamer: motif(d.right_nonamer, NONAMER_LENGTH)?,
        gene_start: coordinates.start,
        gene_end: coordinates.end,
        sequence: extract_d_gene(contig, d)?,
    })
}
