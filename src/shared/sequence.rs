//! Basic nucleotide containers, strands and contigs
use anyhow::{anyhow, Result};
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;

// The IUPAC nucleotides, anything else in a contig is read as N
pub const NUCLEOTIDES: [u8; 15] = [
    b'A', b'C', b'G', b'T', b'N', b'R', b'Y', b'S', b'W', b'K', b'M', b'B', b'D', b'H', b'V',
];

static COMPLEMENT: phf::Map<u8, u8> = phf_map! {
    b'A' => b'T', b'T' => b'A', b'G' => b'C', b'C' => b'G', b'N' => b'N',
    b'R' => b'Y', b'Y' => b'R', b'S' => b'S', b'W' => b'W', b'K' => b'M',
    b'M' => b'K', b'B' => b'V', b'D' => b'H', b'H' => b'D', b'V' => b'B',
    b'a' => b't', b't' => b'a', b'g' => b'c', b'c' => b'g', b'n' => b'n',
};

/// Complement of a single nucleotide, unknown symbols become `N`
pub fn complement(n: u8) -> u8 {
    match COMPLEMENT.get(&n) {
        Some(&c) => c,
        None => COMPLEMENT
            .get(&n.to_ascii_uppercase())
            .copied()
            .unwrap_or(b'N'),
    }
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dna {
    pub seq: Vec<u8>,
}

impl fmt::Display for Dna {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.seq))
    }
}

impl Dna {
    pub fn new() -> Dna {
        Dna { seq: Vec::new() }
    }

    /// Build a sequence from a string, upper-casing it. Reject non-IUPAC symbols.
    pub fn from_string(s: &str) -> Result<Dna> {
        Dna::from_bytes(s.as_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Dna> {
        let seq = bytes.to_ascii_uppercase();
        if let Some(&byte) = seq.iter().find(|b| !NUCLEOTIDES.contains(b)) {
            return Err(anyhow!("Invalid nucleotide: {}", byte as char));
        }
        Ok(Dna { seq })
    }

    /// Upper-case the sequence and replace every non-IUPAC symbol (masking
    /// `X`, RNA `U`, ...) by `N`. Also return the number of replaced symbols.
    pub fn from_bytes_masked(bytes: &[u8]) -> (Dna, usize) {
        let mut nb_replaced = 0;
        let seq = bytes
            .iter()
            .map(|b| {
                let upper = b.to_ascii_uppercase();
                if NUCLEOTIDES.contains(&upper) {
                    upper
                } else {
                    nb_replaced += 1;
                    b'N'
                }
            })
            .collect();
        (Dna { seq }, nb_replaced)
    }

    /// A run of a single nucleotide, used in place of empty fragments
    pub fn filler(nucleotide: u8, length: usize) -> Dna {
        Dna {
            seq: vec![nucleotide; length],
        }
    }

    pub fn get_string(&self) -> String {
        self.to_string()
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn reverse_complement(&self) -> Dna {
        Dna {
            seq: self.seq.iter().rev().map(|&x| complement(x)).collect(),
        }
    }

    pub fn extract_subsequence(&self, start: usize, end: usize) -> Dna {
        // Return dna[start:end]
        Dna {
            seq: self.seq[start..end].to_vec(),
        }
    }

    /// Return dna[start:end], or an error if the interval is not inside the sequence
    ///```
    /// use rssfinder::Dna;
    ///let a = Dna::from_string("ACCAAATGC").unwrap();
    ///assert!(a.checked_subsequence(2, 5).unwrap().get_string() == "CAA".to_string());
    ///assert!(a.checked_subsequence(5, 10).is_err());
    ///assert!(a.checked_subsequence(4, 3).is_err());
    ///```
    pub fn checked_subsequence(&self, start: usize, end: usize) -> Result<Dna> {
        if start > end || end > self.len() {
            return Err(anyhow!(
                "Interval [{}, {}) outside of a sequence of length {}",
                start,
                end,
                self.len()
            ));
        }
        Ok(self.extract_subsequence(start, end))
    }

    /// Read `k` bases at `pos` in the orientation of the strand they were found on
    pub fn motif_on_strand(&self, pos: usize, k: usize, strand: Strand) -> Result<Dna> {
        let motif = self.checked_subsequence(pos, pos + k)?;
        Ok(match strand {
            Strand::Forward => motif,
            Strand::Reverse => motif.reverse_complement(),
        })
    }
}

/// The two reading directions of a contig
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub const BOTH: [Strand; 2] = [Strand::Forward, Strand::Reverse];

    /// The sequence as read on this strand
    pub fn orient(&self, dna: &Dna) -> Dna {
        match self {
            Strand::Forward => dna.clone(),
            Strand::Reverse => dna.reverse_complement(),
        }
    }

    /// Express the start of a k-window found on this strand in forward coordinates.
    /// On the reverse strand this is an involution: applying it twice gives `pos` back.
    pub fn to_forward(&self, pos: usize, k: usize, seq_length: usize) -> usize {
        match self {
            Strand::Forward => pos,
            Strand::Reverse => seq_length - pos - k,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

/// A named genomic sequence, forward strand only
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contig {
    pub id: String,
    pub seq: Dna,
}

impl Contig {
    pub fn new(id: &str, seq: Dna) -> Contig {
        Contig {
            id: id.to_string(),
            seq,
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}
