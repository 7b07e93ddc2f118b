use anyhow::Result;
use rssfinder::report::{rss_report_name, write_reports};
use rssfinder::rss::{combine_d_rss, find_valid_motifs, find_valid_rss, MotifHits};
use rssfinder::shared::{HeptamerFilter, KmerSet};
use rssfinder::{
    Detector, Locus, LocusParameters, MotifLibrary, MotifSet, PipelineParameters,
    ReferenceLibrary, RssCandidate, SignalType, Strand,
};

mod common;
use common::Lcg;

#[test]
fn scanner_equals_naive_scan() -> Result<()> {
    let mut rng = Lcg(42);
    for _ in 0..20 {
        let length = 300 + rng.below(500);
        let dna = rng.dna(length);
        for k in [7, 9] {
            let mut motifs = KmerSet::default();
            // a few k-mers that are present, and random ones
            for _ in 0..5 {
                let p = rng.below(length - k);
                motifs.insert(dna.seq[p..p + k].to_vec());
            }
            for _ in 0..20 {
                motifs.insert(rng.dna(k).seq);
            }
            let hits = find_valid_motifs(&dna.seq, &motifs, k);
            let naive: Vec<usize> = (0..=length - k)
                .filter(|&i| motifs.contains(&dna.seq[i..i + k]))
                .collect();
            assert!(!naive.is_empty());
            assert_eq!(hits.positions(), naive.as_slice());
        }
    }
    Ok(())
}

#[test]
fn pairing_is_sound_and_complete() -> Result<()> {
    let mut rng = Lcg(7);
    for signal in SignalType::ALL {
        for _ in 0..50 {
            let spacer = if rng.below(2) == 0 { 12 } else { 23 };
            let heptamers = MotifHits::from_positions((0..40).map(|_| rng.below(300)).collect());
            let nonamers = MotifHits::from_positions((0..40).map(|_| rng.below(300)).collect());
            let pairs = find_valid_rss(&heptamers, &nonamers, signal, spacer, Strand::Forward, 400);

            for &(h, n) in &pairs {
                assert!(heptamers.contains(h) && nonamers.contains(n));
                let gap = if signal.heptamer_first() {
                    n as i64 - (h + 7) as i64
                } else {
                    h as i64 - (n + 9) as i64
                };
                assert!((gap - spacer as i64).abs() <= 1);
            }

            let (first, second, k) = if signal.heptamer_first() {
                (&heptamers, &nonamers, 7)
            } else {
                (&nonamers, &heptamers, 9)
            };
            for &p in first.positions() {
                let has_partner = [spacer - 1, spacer, spacer + 1]
                    .iter()
                    .any(|s| second.contains(p + k + s));
                let nb_pairs = pairs
                    .iter()
                    .filter(|&&(h, n)| if signal.heptamer_first() { h == p } else { n == p })
                    .count();
                assert_eq!(nb_pairs, has_partner as usize);
            }
        }
    }
    Ok(())
}

#[test]
fn shorter_spacer_preferred_over_longer() -> Result<()> {
    let heptamers = MotifHits::from_positions(vec![10]);
    let nonamers = MotifHits::from_positions(vec![28, 30]);
    let pairs = find_valid_rss(&heptamers, &nonamers, SignalType::V, 12, Strand::Forward, 100);
    assert_eq!(pairs, vec![(10, 28)]);
    Ok(())
}

#[test]
fn reverse_remap_is_an_involution() -> Result<()> {
    for length in [9, 10, 57, 200] {
        for k in [7, 9] {
            for pos in 0..=(length - k) {
                let fwd = Strand::Reverse.to_forward(pos, k, length);
                assert!(fwd + k <= length);
                assert_eq!(Strand::Reverse.to_forward(fwd, k, length), pos);
            }
        }
    }
    Ok(())
}

#[test]
fn d_candidates_respect_span_bounds() -> Result<()> {
    let mut rng = Lcg(1234);
    let max_length = 40;
    for strand in Strand::BOTH {
        let mut random_rss = |signal| -> Vec<RssCandidate> {
            (0..60)
                .map(|_| RssCandidate {
                    contig: rng.below(2),
                    strand: Strand::BOTH[rng.below(2)],
                    signal,
                    heptamer: rng.below(200),
                    nonamer: rng.below(200),
                })
                .collect()
        };
        let left = random_rss(SignalType::DLeft);
        let right = random_rss(SignalType::DRight);
        let joined = combine_d_rss(&left, &right, strand, max_length);
        assert!(!joined.is_empty());
        for d in joined {
            assert_eq!(d.strand, strand);
            let (up, down) = d.flanking_heptamers();
            assert!(up + 7 <= down);
            assert!(down - (up + 7) <= max_length);
            // both RSS come from the same contig and strand
            assert!(left.iter().any(|r| r.contig == d.contig
                && r.strand == strand
                && r.heptamer == d.left_heptamer
                && r.nonamer == d.left_nonamer));
            assert!(right.iter().any(|r| r.contig == d.contig
                && r.strand == strand
                && r.heptamer == d.right_heptamer
                && r.nonamer == d.right_nonamer));
        }
    }
    Ok(())
}

#[test]
fn rss_only_run_finds_a_single_forward_pair() -> Result<()> {
    let mut params = LocusParameters::for_locus(Locus::TRA);
    params.restrict_gene_types("v")?;
    params.spacer_lengths.insert(SignalType::V, 0);
    let mut motifs = MotifLibrary::new();
    motifs.insert(SignalType::V, MotifSet::new(&["CACAGTG"], &["AAAAAAAAA"])?);

    let detector = Detector::new(
        params,
        PipelineParameters::new(2, true),
        motifs,
        ReferenceLibrary::new(),
    )?;
    let contigs = vec![common::contig(
        "c1",
        "AAAAAAACACAGTGAAAAAAAAACACTGTGAAAAAAAAA",
    )?];
    let result = detector.run(&contigs)?;

    assert_eq!(
        result.catalog.get(SignalType::V).to_vec(),
        vec![RssCandidate {
            contig: 0,
            strand: Strand::Forward,
            signal: SignalType::V,
            heptamer: 7,
            nonamer: 14,
        }]
    );
    assert!(result.genes.is_empty());
    assert!(result.d_genes.is_empty());
    assert!(result.failures.is_empty());

    let dir = tempfile::tempdir()?;
    write_reports(
        dir.path(),
        &result,
        &contigs,
        &[SignalType::V],
        &[],
        &HeptamerFilter::default(),
    )?;
    let report = std::fs::read_to_string(dir.path().join(rss_report_name(SignalType::V)))?;
    assert_eq!(
        report.lines().collect::<Vec<_>>(),
        vec![
            "7-mer index\t9-mer index\t7-mer\t9-mer\treference contig\tstrand",
            "7\t14\tCACAGTG\tAAAAAAAAA\tc1\t+",
        ]
    );
    assert!(dir.path().join("rss_V.csv").exists());
    Ok(())
}

#[test]
fn reverse_strand_rss_in_forward_coordinates() -> Result<()> {
    let params = common::igh_parameters("v")?;
    let detector = Detector::new(
        params,
        PipelineParameters::new(1, true),
        common::motif_library()?,
        ReferenceLibrary::new(),
    )?;
    let rev = common::reverse_complement(&common::v_construct())?;
    let contigs = vec![
        common::contig("short", "CACAGTG")?,
        common::contig("rev", &rev)?,
    ];
    let catalog = detector.find_rss(&contigs)?;
    assert_eq!(
        catalog.get(SignalType::V).to_vec(),
        vec![RssCandidate {
            contig: 1,
            strand: Strand::Reverse,
            signal: SignalType::V,
            heptamer: 42,
            nonamer: 10,
        }]
    );
    Ok(())
}
