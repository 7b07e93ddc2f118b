//! Tab separated reports of the RSS and of the predicted genes

use crate::genes::{DPrediction, GenePrediction};
use crate::pipeline::DetectionResult;
use crate::rss::RssCandidate;
use crate::shared::{
    Contig, GeneType, HeptamerFilter, SignalType, HEPTAMER_LENGTH, NONAMER_LENGTH,
};
use anyhow::{anyhow, Context, Result};
use csv::{Writer, WriterBuilder};
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

const RSS_HEADER: [&str; 6] = [
    "7-mer index",
    "9-mer index",
    "7-mer",
    "9-mer",
    "reference contig",
    "strand",
];

const VJ_HEADER: [&str; 13] = [
    "reference contig",
    "strand",
    "heptamer index",
    "nonamer index",
    "heptamer",
    "nonamer",
    "start of gene",
    "end of gene",
    "best aligned human gene",
    "alignment direction",
    "alignment PI",
    "longest common k-mer",
    "gene sequence",
];

const D_HEADER: [&str; 13] = [
    "reference contig",
    "strand",
    "left heptamer index",
    "left nonamer index",
    "left heptamer",
    "left nonamer",
    "right heptamer index",
    "right nonamer index",
    "right heptamer",
    "right nonamer",
    "start of gene",
    "end of gene",
    "gene sequence",
];

fn tsv_writer<W: Write>(writer: W) -> Writer<W> {
    WriterBuilder::new().delimiter(b'\t').from_writer(writer)
}

/// One row per RSS, motifs read in signal orientation. `rss` is expected in
/// catalog order (forward strand first).
pub fn write_rss_report<W: Write>(
    writer: W,
    rss: &[RssCandidate],
    contigs: &[Contig],
    filter: &HeptamerFilter,
) -> Result<usize> {
    let mut wtr = tsv_writer(writer);
    wtr.write_record(RSS_HEADER)?;
    let mut nb_rows = 0;
    for r in rss {
        let contig = contigs
            .get(r.contig)
            .ok_or(anyhow!("RSS on an unknown contig ({})", r.contig))?;
        if !filter.accept(r.heptamer, contig.len()) {
            continue;
        }
        let heptamer = contig
            .seq
            .motif_on_strand(r.heptamer, HEPTAMER_LENGTH, r.strand)?;
        let nonamer = contig
            .seq
            .motif_on_strand(r.nonamer, NONAMER_LENGTH, r.strand)?;
        wtr.write_record([
            r.heptamer.to_string(),
            r.nonamer.to_string(),
            heptamer.get_string(),
            nonamer.get_string(),
            contig.id.clone(),
            r.strand.to_string(),
        ])?;
        nb_rows += 1;
    }
    wtr.flush()?;
    Ok(nb_rows)
}

pub fn write_gene_report<W: Write>(writer: W, predictions: &[GenePrediction]) -> Result<()> {
    let mut wtr = tsv_writer(writer);
    wtr.write_record(VJ_HEADER)?;
    for p in predictions {
        wtr.write_record([
            p.contig_id.clone(),
            p.strand.to_string(),
            p.heptamer_index.to_string(),
            p.nonamer_index.to_string(),
            p.heptamer.get_string(),
            p.nonamer.get_string(),
            p.gene_start.to_string(),
            p.gene_end.to_string(),
            p.reference_id.clone(),
            p.alignment_direction.to_string(),
            format!("{}", p.percent_identity.round_ties_even() as i64),
            p.longest_run.to_string(),
            p.sequence.get_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_d_report<W: Write>(writer: W, predictions: &[DPrediction]) -> Result<()> {
    let mut wtr = tsv_writer(writer);
    wtr.write_record(D_HEADER)?;
    for p in predictions {
        wtr.write_record([
            p.contig_id.clone(),
            p.strand.to_string(),
            p.left_heptamer_index.to_string(),
            p.left_nonamer_index.to_string(),
            p.left_heptamer.get_string(),
            p.left_nonamer.get_string(),
            p.right_heptamer_index.to_string(),
            p.right_nonamer_index.to_string(),
            p.right_heptamer.get_string(),
            p.right_nonamer.get_string(),
            p.gene_start.to_string(),
            p.gene_end.to_string(),
            p.sequence.get_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Error creating the report file {}", path.display()))?;
    Ok(BufWriter::new(file))
}

pub fn rss_report_name(signal: SignalType) -> String {
    format!("rss_{}.csv", signal.name())
}

pub fn gene_report_name(gene_type: GeneType) -> String {
    format!("genes_{}.tsv", gene_type)
}

/// Write every report of a run in `output_dir` (created if needed)
pub fn write_reports(
    output_dir: &Path,
    result: &DetectionResult,
    contigs: &[Contig],
    signals: &[SignalType],
    gene_types: &[GeneType],
    filter: &HeptamerFilter,
) -> Result<()> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!("Error creating the output directory {}", output_dir.display())
    })?;
    for &signal in signals {
        let path = output_dir.join(rss_report_name(signal));
        let nb_rows = write_rss_report(
            create(&path)?,
            result.catalog.get(signal),
            contigs,
            filter,
        )?;
        info!("{} RSS written to {}", nb_rows, path.display());
    }
    for &gene_type in gene_types {
        let path = output_dir.join(gene_report_name(gene_type));
        match gene_type {
            GeneType::D => write_d_report(create(&path)?, &result.d_genes)?,
            _ => write_gene_report(create(&path)?, result.predictions(gene_type))?,
        }
        info!("{} genes written to {}", gene_type, path.display());
    }
    Ok(())
}
