//! Parsers for the contig / reference fasta files and the motif tables

use crate::shared::gene::{ReferenceGene, ReferenceSet};
use crate::shared::parameters::{
    GeneType, Locus, LocusParameters, SignalType, HEPTAMER_LENGTH, NONAMER_LENGTH,
};
use crate::shared::sequence::{Contig, Dna};
use anyhow::{anyhow, Context, Result};
use bio::io::fasta;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// k-mers stored uppercase, membership is case-sensitive on the stored form
pub type KmerSet = std::collections::HashSet<Vec<u8>, foldhash::fast::RandomState>;

/// Valid heptamers and nonamers of one signal type
#[derive(Default, Clone, Debug)]
pub struct MotifSet {
    pub heptamers: KmerSet,
    pub nonamers: KmerSet,
}

impl MotifSet {
    pub fn new<S: AsRef<str>>(heptamers: &[S], nonamers: &[S]) -> Result<MotifSet> {
        Ok(MotifSet {
            heptamers: kmer_set(heptamers, HEPTAMER_LENGTH)?,
            nonamers: kmer_set(nonamers, NONAMER_LENGTH)?,
        })
    }

    pub fn kmers(&self, k: usize) -> Result<&KmerSet> {
        match k {
            HEPTAMER_LENGTH => Ok(&self.heptamers),
            NONAMER_LENGTH => Ok(&self.nonamers),
            _ => Err(anyhow!("No motif of length {}", k)),
        }
    }
}

fn kmer_set<S: AsRef<str>>(kmers: &[S], k: usize) -> Result<KmerSet> {
    kmers
        .iter()
        .map(|s| {
            let kmer = s.as_ref().trim().as_bytes().to_ascii_uppercase();
            if kmer.len() != k {
                return Err(anyhow!(
                    "Motif {} has length {} (expected {})",
                    s.as_ref(),
                    kmer.len(),
                    k
                ));
            }
            Ok(kmer)
        })
        .collect()
}

/// All motif sets, keyed by signal type
#[derive(Default, Clone, Debug)]
pub struct MotifLibrary {
    pub motifs: HashMap<SignalType, MotifSet>,
}

// on-disk layout: {"V": {"7": [...], "9": [...]}, "D_left": {...}, ...}
#[derive(Serialize, Deserialize, Debug)]
struct MotifRecord {
    #[serde(rename = "7")]
    heptamers: Vec<String>,
    #[serde(rename = "9")]
    nonamers: Vec<String>,
}

impl MotifLibrary {
    pub fn new() -> MotifLibrary {
        MotifLibrary {
            motifs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, signal: SignalType, motifs: MotifSet) {
        self.motifs.insert(signal, motifs);
    }

    pub fn get(&self, signal: SignalType) -> Result<&MotifSet> {
        self.motifs
            .get(&signal)
            .ok_or(anyhow!("No valid motifs provided for signal type {}", signal))
    }

    pub fn load_json<R: Read>(reader: R) -> Result<MotifLibrary> {
        let records: HashMap<String, MotifRecord> =
            serde_json::from_reader(reader).context("Invalid motif file")?;
        let mut library = MotifLibrary::new();
        for (key, record) in records {
            let signal: SignalType = key.parse()?;
            let set = MotifSet::new(&record.heptamers, &record.nonamers)
                .with_context(|| format!("Invalid motifs for signal type {}", signal))?;
            library.insert(signal, set);
        }
        Ok(library)
    }

    pub fn load_from_file(path: &Path) -> Result<MotifLibrary> {
        let file = File::open(path)
            .with_context(|| format!("Error opening the motif file {}", path.display()))?;
        MotifLibrary::load_json(file)
    }

    /// Every scanned signal type needs a non-empty motif table
    pub fn validate(&self, params: &LocusParameters) -> Result<()> {
        for st in params.signal_types() {
            let set = self.get(st)?;
            if set.heptamers.is_empty() || set.nonamers.is_empty() {
                return Err(anyhow!("Empty motif table for signal type {}", st));
            }
        }
        Ok(())
    }
}

/// Read fasta records as (id, raw sequence)
pub fn read_fasta<R: Read>(reader: R) -> Result<Vec<(String, Vec<u8>)>> {
    let reader = fasta::Reader::new(reader);
    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| anyhow!("Error reading the fasta record {:?}", e))?;
        records.push((record.id().to_string(), record.seq().to_vec()));
    }
    Ok(records)
}

/// Contigs are kept whatever their content, unknown symbols are read as `N`
pub fn read_contigs<R: Read>(reader: R) -> Result<Vec<Contig>> {
    Ok(read_fasta(reader)?
        .into_iter()
        .map(|(id, seq)| {
            let (dna, nb_replaced) = Dna::from_bytes_masked(&seq);
            if nb_replaced > 0 {
                warn!("Contig {}: {} non-IUPAC symbols read as N", id, nb_replaced);
            }
            Contig::new(&id, dna)
        })
        .collect())
}

pub fn read_contigs_from_file(path: &Path) -> Result<Vec<Contig>> {
    let file = File::open(path)
        .with_context(|| format!("Error opening the input file {}", path.display()))?;
    let contigs = read_contigs(file)?;
    info!("Read {} contigs from {}", contigs.len(), path.display());
    Ok(contigs)
}

pub fn read_references<R: Read>(reader: R, gene_type: GeneType) -> Result<ReferenceSet> {
    let genes = read_fasta(reader)?
        .into_iter()
        .map(|(id, seq)| {
            let dna = Dna::from_bytes(&seq).with_context(|| format!("In reference gene {}", id))?;
            ReferenceGene::new(&id, dna)
        })
        .collect::<Result<Vec<_>>>()?;
    ReferenceSet::new(gene_type, genes)
}

/// The canonical V and J genes of a locus
#[derive(Default, Clone, Debug)]
pub struct ReferenceLibrary {
    pub references: HashMap<GeneType, ReferenceSet>,
}

impl ReferenceLibrary {
    pub fn new() -> ReferenceLibrary {
        ReferenceLibrary {
            references: HashMap::new(),
        }
    }

    pub fn insert(&mut self, set: ReferenceSet) -> Result<()> {
        let gene_type = set
            .gene_type
            .ok_or(anyhow!("Reference set without gene type"))?;
        self.references.insert(gene_type, set);
        Ok(())
    }

    pub fn get(&self, gene_type: GeneType) -> Result<&ReferenceSet> {
        self.references
            .get(&gene_type)
            .ok_or(anyhow!("No reference {} genes loaded", gene_type))
    }

    /// Load `<dir>/<LOCUS><V|J>.fa` for the V and J gene types of `params`
    pub fn load_from_dir(dir: &Path, params: &LocusParameters) -> Result<ReferenceLibrary> {
        let mut library = ReferenceLibrary::new();
        for &gt in params.gene_types.iter().filter(|&&g| g != GeneType::D) {
            let path = dir.join(reference_file_name(params.locus, gt));
            let file = File::open(&path).with_context(|| {
                format!("Error opening the reference file {}", path.display())
            })?;
            let set = read_references(file, gt)
                .with_context(|| format!("In reference file {}", path.display()))?;
            set.check_names(params.locus);
            info!("Loaded {} reference {} genes", set.len(), gt);
            library.insert(set)?;
        }
        Ok(library)
    }

    pub fn validate(&self, params: &LocusParameters) -> Result<()> {
        for &gt in params.gene_types.iter().filter(|&&g| g != GeneType::D) {
            if self.get(gt)?.is_empty() {
                return Err(anyhow!("No reference {} gene provided", gt));
            }
        }
        Ok(())
    }
}

/// Everything a run needs that is read from the data directory
pub fn load_data_dir(
    data_dir: &Path,
    params: &LocusParameters,
    rss_only: bool,
) -> Result<(MotifLibrary, ReferenceLibrary)> {
    let motifs = MotifLibrary::load_from_file(&data_dir.join("motifs.json"))?;
    motifs.validate(params)?;
    let references = if rss_only {
        ReferenceLibrary::new()
    } else {
        ReferenceLibrary::load_from_dir(&data_dir.join("combined_reference_genes"), params)?
    };
    Ok((motifs, references))
}

/// Name of the reference fasta file of a locus and gene type, e.g. IGHV.fa
pub fn reference_file_name(locus: Locus, gene_type: GeneType) -> String {
    format!("{}{}.fa", locus, gene_type)
}
