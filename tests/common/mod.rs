use anyhow::Result;
use rssfinder::shared::{ReferenceGene, ReferenceSet};
use rssfinder::{
    Contig, Dna, GeneType, LocusParameters, MotifLibrary, MotifSet, ReferenceLibrary, SignalType,
};

// start of IGHV3-23
pub const V_GENE: &str = "GAGGTGCAGCTGGTGGAGTCTGGGGGAGGCTTGGTACAGCCTGGGGGGTCCCTGAGACTCTCCTGTGCAGCCTCTGGATTCACC";
// start of IGHV1-2
pub const V_GENE_2: &str = "CAGGTGCAGCTGGTGCAGTCTGGGGCTGAGGTGAAGAAGCCTGGGGCCTCAGTGAAGGTCTCCTGCAAGGCTTCTGGATACACC";
pub const J_GENE: &str = "GCTACTGGTACTTCGATCTCTGGGGCCGTGGCACCCTGGTCACTGTCTCCTCAG";
pub const D_GENE: &str = "GTATTACGATATTTT";

pub const HEPTAMER: &str = "CACAGTG";
pub const NONAMER: &str = "ACAAAAACC";
// reverse complements of the above
pub const HEPTAMER_RC: &str = "CACTGTG";
pub const NONAMER_RC: &str = "GGTTTTTGT";

/// 10 bases, a V gene, its heptamer at 94, a 23 bases spacer and the nonamer
/// at 124. Length 143.
#[allow(dead_code)]
pub fn v_construct() -> String {
    format!(
        "TTGACCTAGG{}{}GTTGCTGAGGATCTGAGGCTTCA{}GCTCTTGGAA",
        V_GENE, HEPTAMER, NONAMER
    )
}

/// 10 bases, a nonamer at 10, a 23 bases spacer, the heptamer at 42 and a
/// J gene (54 bases) starting at 49. Length 113.
#[allow(dead_code)]
pub fn j_construct() -> String {
    format!(
        "GCTCTTGGAA{}GTTGCTGAGGATCTGAGGCTTCA{}{}TTGACCTAGG",
        NONAMER_RC, HEPTAMER_RC, J_GENE
    )
}

/// D-left RSS (nonamer at 10, heptamer at 31), a 15 bases D gene at 38,
/// D-right RSS (heptamer at 53, nonamer at 72). Length 91.
#[allow(dead_code)]
pub fn d_construct() -> String {
    format!(
        "TCGATCGGAT{}ATGCTAGCTAAG{}{}{}ATGCTAGCTAAG{}AGCTAGCTTC",
        NONAMER_RC, HEPTAMER_RC, D_GENE, HEPTAMER, NONAMER
    )
}

#[allow(dead_code)]
pub fn contig(id: &str, seq: &str) -> Result<Contig> {
    Ok(Contig::new(id, Dna::from_string(seq)?))
}

#[allow(dead_code)]
pub fn reverse_complement(seq: &str) -> Result<String> {
    Ok(Dna::from_string(seq)?.reverse_complement().get_string())
}

/// Same motifs for every signal type
#[allow(dead_code)]
pub fn motif_library() -> Result<MotifLibrary> {
    let mut library = MotifLibrary::new();
    library.insert(SignalType::V, MotifSet::new(&[HEPTAMER], &[NONAMER])?);
    library.insert(SignalType::J, MotifSet::new(&[HEPTAMER_RC], &[NONAMER_RC])?);
    library.insert(
        SignalType::DLeft,
        MotifSet::new(&[HEPTAMER_RC], &[NONAMER_RC])?,
    );
    library.insert(SignalType::DRight, MotifSet::new(&[HEPTAMER], &[NONAMER])?);
    Ok(library)
}

#[allow(dead_code)]
pub fn reference_library() -> Result<ReferenceLibrary> {
    let mut library = ReferenceLibrary::new();
    library.insert(ReferenceSet::new(
        GeneType::V,
        vec![
            ReferenceGene::new("IGHV1-2*02", Dna::from_string(V_GENE_2)?)?,
            ReferenceGene::new("IGHV3-23*01", Dna::from_string(V_GENE)?)?,
        ],
    )?)?;
    library.insert(ReferenceSet::new(
        GeneType::J,
        vec![ReferenceGene::new("IGHJ2*01", Dna::from_string(J_GENE)?)?],
    )?)?;
    Ok(library)
}

#[allow(dead_code)]
pub fn igh_parameters(genes: &str) -> Result<LocusParameters> {
    let mut params = LocusParameters::default();
    params.restrict_gene_types(genes)?;
    Ok(params)
}

/// Deterministic pseudo-random generator for the property tests
#[allow(dead_code)]
pub struct Lcg(pub u64);

#[allow(dead_code)]
impl Lcg {
    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    pub fn below(&mut self, n: usize) -> usize {
        (self.next() % (n as u64)) as usize
    }

    pub fn dna(&mut self, length: usize) -> Dna {
        let seq = (0..length).map(|_| b"ACGT"[self.below(4)]).collect();
        Dna { seq }
    }
}
