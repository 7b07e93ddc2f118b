//! Extraction of the candidate gene sequences ("S fragments") next to an RSS
use crate::rss::{DCandidate, RssCandidate};
use crate::shared::{Contig, Dna, GeneType, Strand, HEPTAMER_LENGTH};
use anyhow::{anyhow, Context, Result};

/// Candidate gene sequence implied by one RSS
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SFragment {
    pub rss: RssCandidate,
    pub gene_type: GeneType,
    // forward-contig interval [start, start + seq.len()) the fragment comes from
    pub start: usize,
    // read 5' -> 3' in the gene direction (reverse complemented on the reverse strand)
    pub seq: Dna,
}

impl SFragment {
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn end(&self) -> usize {
        self.start + self.seq.len()
    }
}

/// True when the gene sits before the heptamer in forward coordinates
fn gene_upstream(gene_type: GeneType, strand: Strand) -> Result<bool> {
    match (gene_type, strand) {
        (GeneType::V, Strand::Forward) | (GeneType::J, Strand::Reverse) => Ok(true),
        (GeneType::J, Strand::Forward) | (GeneType::V, Strand::Reverse) => Ok(false),
        (GeneType::D, _) => Err(anyhow!("D genes are delimited by two RSS")),
    }
}

/// Take up to `length` bases next to the heptamer of `rss`, on the side of
/// the gene. The window is clipped at the contig ends.
pub fn extract_s_fragment(
    contig: &Contig,
    rss: &RssCandidate,
    gene_type: GeneType,
    length: usize,
) -> Result<SFragment> {
    let h = rss.heptamer;
    let (start, end) = if gene_upstream(gene_type, rss.strand)? {
        (h.saturating_sub(length), h)
    } else {
        let start = h + HEPTAMER_LENGTH;
        (start, (start + length).min(contig.len()))
    };

    let window = contig.seq.checked_subsequence(start, end).with_context(|| {
        format!(
            "{} fragment of contig {} ({} strand, heptamer {})",
            gene_type, contig.id, rss.strand, h
        )
    })?;

    Ok(SFragment {
        rss: *rss,
        gene_type,
        start,
        seq: rss.strand.orient(&window),
    })
}

/// The sequence strictly between the two heptamers of a D candidate, in gene
/// orientation
pub fn extract_d_gene(contig: &Contig, d: &DCandidate) -> Result<Dna> {
    let (start, end) = d.gene_interval();
    let window = contig.seq.checked_subsequence(start, end).with_context(|| {
        format!(
            "D gene of contig {} ({} strand, heptamers {} / {})",
            contig.id, d.strand, d.left_heptamer, d.right_heptamer
        )
    })?;
    Ok(d.strand.orient(&window))
}
