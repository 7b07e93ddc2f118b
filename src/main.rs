use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rssfinder::report::write_reports;
use rssfinder::shared::parser::read_contigs_from_file;
use rssfinder::shared::HeptamerFilter;
use rssfinder::{load_data_dir, Detector, Locus, LocusParameters, PipelineParameters};
use std::path::PathBuf;

/// Find the V, D and J gene segments of an immunoglobulin / TCR locus from
/// their recombination signal sequences
#[derive(Parser, Debug)]
#[command(name = "rssfinder")]
#[command(version, about = "RSS-based detection of V(D)J gene segments in assembled contigs")]
struct Args {
    /// Input fasta file with the contigs
    #[arg(short = 'i', long)]
    input_file: PathBuf,

    /// Output directory (default: input path without its extension)
    #[arg(short = 'o', long)]
    output_directory: Option<PathBuf>,

    /// Locus (IGH, IGK, IGL, TRA, TRB or TRD)
    #[arg(short = 'l', long, default_value = "IGH")]
    locus: Locus,

    /// Number of worker threads
    #[arg(short = 'm', long, default_value = "1")]
    multi_process: usize,

    /// Only search the RSS, do not predict genes
    #[arg(short = 'r', long)]
    rss_only: bool,

    /// Gene types to find, e.g. "vdj", "vj" or "d" (default: all of the locus)
    #[arg(short = 'g', long)]
    genes_type: Option<String>,

    /// Directory with motifs.json and combined_reference_genes/
    #[arg(short = 'd', long, default_value = "datafiles")]
    data_dir: PathBuf,

    /// Drop from the RSS reports the heptamers before this position
    #[arg(long)]
    min_heptamer: Option<usize>,

    /// Drop from the RSS reports the heptamers closer than this to the contig end
    #[arg(long)]
    max_heptamer: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut params = LocusParameters::for_locus(args.locus);
    if let Some(genes) = &args.genes_type {
        params.restrict_gene_types(genes)?;
    }
    let mut pipeline = PipelineParameters::new(args.multi_process, args.rss_only);
    pipeline.heptamer_filter = HeptamerFilter {
        min_heptamer: args.min_heptamer,
        max_heptamer: args.max_heptamer,
    };
    let output_dir = args
        .output_directory
        .clone()
        .unwrap_or_else(|| args.input_file.with_extension(""));

    info!("Input file: {}", args.input_file.display());
    info!("Output directory: {}", output_dir.display());

    let (motifs, references) = load_data_dir(&args.data_dir, &params, args.rss_only)
        .with_context(|| format!("In data directory {}", args.data_dir.display()))?;
    let contigs = read_contigs_from_file(&args.input_file)?;

    let signals = params.signal_types();
    let gene_types = if args.rss_only {
        Vec::new()
    } else {
        params.gene_types.clone()
    };
    let filter = pipeline.heptamer_filter;
    let detector = Detector::new(params, pipeline, motifs, references)?;
    let result = detector.run(&contigs)?;

    write_reports(&output_dir, &result, &contigs, &signals, &gene_types, &filter)?;
    if !result.failures.is_empty() {
        info!("{} tasks failed (see warnings above)", result.failures.len());
    }
    info!("Done");
    Ok(())
}
