//! End-to-end tests for the `parcraft` binary.
//!
//! The fixtures model a small GRCh38-like assembly: chromosome 1 plus the two
//! allosomes, with a known PAR region at the start of Y.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::prelude::*;
use tempfile::TempDir;

const CHR1: &str = "NC_000001.11";
const CHRX: &str = "NC_000023.11";
const CHRY: &str = "NC_000024.10";

const ASSEMBLY: &str = "\
##gff-version 3
chr1\tRefSeq\tchromosome\t1\t1000000\t.\t.\t.\tID=chr1;Dbxref=RefSeq:NC_000001.11;Name=1
chrX\tRefSeq\tchromosome\t1\t1000000\t.\t.\t.\tID=chrX;Dbxref=RefSeq:NC_000023.11;Name=X;tag=allosome
chrY\tRefSeq\tchromosome\t1\t1000000\t.\t.\t.\tID=chrY;Dbxref=RefSeq:NC_000024.10;Name=Y;tag=allosome
chrY\tRefSeq\tregion\t1\t1000\t.\t.\t.\tID=PAR1;Parent=chrY;tag=PAR
";

const TRANSLATIONS: &str = "\
>NP_X1.1
MEELTAFVSKSFDQKVKEKKE
>NP_Y1.1
MEELTAFVSKSFDQKVKEKKE
>NP_X9.1
MAAAAA
>NP_Y9.1
MCCCCC
>NP_X4.1
MKKLLQ
>NP_Y4.1
MKKLLR
>NP_15.1
MSTOP
>NP_Y5.1
MSTOP
";

/// Gene, mRNA and CDS lines for one copy of a gene
fn gene_model(accession: &str, start: u64, gene_id: &str, protein: &str) -> String {
    let end = start + 500;
    let gene = format!("gene-{gene_id}-{accession}");
    let rna = format!("rna-{gene_id}-{accession}");
    format!(
        "{accession}\tBestRefSeq\tgene\t{start}\t{end}\t.\t+\t.\tID={gene};Dbxref=GeneID:{gene_id};gbkey=Gene\n\
         {accession}\tBestRefSeq\tmRNA\t{start}\t{end}\t.\t+\t.\tID={rna};Parent={gene};Dbxref=GeneID:{gene_id};gbkey=mRNA\n\
         {accession}\tBestRefSeq\tCDS\t{start}\t{end}\t.\t+\t0\tID=cds-{protein};Parent={rna};Dbxref=GeneID:{gene_id};protein_id={protein};gbkey=CDS\n"
    )
}

/// Annotation data covering every classification outcome
fn annotation() -> String {
    [
        "##gff-version 3\n#!genome-build GRCh38.p14\n".to_string(),
        // Known: inside PAR1 on Y, translations differ
        gene_model(CHRX, 100, "999", "NP_X9.1"),
        gene_model(CHRY, 100, "999", "NP_Y9.1"),
        // Inferred: identical translations
        gene_model(CHRX, 10_000, "1234", "NP_X1.1"),
        gene_model(CHRY, 10_000, "1234", "NP_Y1.1"),
        // Unresolved: translations differ
        gene_model(CHRX, 30_000, "4321", "NP_X4.1"),
        gene_model(CHRY, 30_000, "4321", "NP_Y4.1"),
        // Rejected: Y and an autosome
        gene_model(CHR1, 20_000, "5678", "NP_15.1"),
        gene_model(CHRY, 20_000, "5678", "NP_Y5.1"),
    ]
    .concat()
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("asm.gff3"), ASSEMBLY).unwrap();
        fs::write(dir.path().join("data.gff"), annotation()).unwrap();
        fs::write(dir.path().join("proteins.faa"), TRANSLATIONS).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn tag(&self, input: &str, output: &str) -> Command {
        let mut cmd = Command::cargo_bin("parcraft").unwrap();
        cmd.arg("tag")
            .arg("--in-data-file")
            .arg(self.path(input))
            .arg("--asm-conf-file")
            .arg(self.path("asm.gff3"))
            .arg("--out-data-file")
            .arg(self.path(output));
        cmd
    }
}

/// Data lines carrying `tag=PAR`
fn tagged_lines(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|line| line.ends_with("tag=PAR") || line.contains("tag=PAR;"))
        .collect()
}

fn gene_ids_of(lines: &[&str]) -> Vec<String> {
    let mut ids: Vec<String> = lines
        .iter()
        .filter_map(|line| {
            let (_, rest) = line.split_once("GeneID:")?;
            Some(rest.split(';').next()?.to_string())
        })
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

fn read_gz(path: &Path) -> String {
    let mut text = String::new();
    MultiGzDecoder::new(fs::File::open(path).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    text
}

#[test]
fn test_tag_known_par_without_translations() {
    let fixture = Fixture::new();
    fixture
        .tag("data.gff", "tagged.gff")
        .assert()
        .success()
        .stderr(predicate::str::contains("duplicate gene ID '5678'"));

    let output = fs::read_to_string(fixture.path("tagged.gff")).unwrap();
    let tagged = tagged_lines(&output);
    assert_eq!(tagged.len(), 3);
    assert!(tagged.iter().all(|line| line.starts_with(CHRY)));
    assert_eq!(gene_ids_of(&tagged), ["999"]);
}

#[test]
fn test_tag_infers_par_from_translations() {
    let fixture = Fixture::new();
    fixture
        .tag("data.gff", "tagged.gff")
        .arg("--transl-file")
        .arg(fixture.path("proteins.faa"))
        .assert()
        .success()
        .stderr(predicate::str::contains("tagging feature of inferred PAR gene '1234'"));

    let input = annotation();
    let output = fs::read_to_string(fixture.path("tagged.gff")).unwrap();
    let tagged = tagged_lines(&output);
    assert_eq!(tagged.len(), 6);
    assert!(tagged.iter().all(|line| line.starts_with(CHRY)));
    assert_eq!(gene_ids_of(&tagged), ["1234", "999"]);

    // Every other line is byte-identical
    assert_eq!(input.lines().count(), output.lines().count());
    for (before, after) in input.lines().zip(output.lines()) {
        if before != after {
            assert_eq!(format!("{before};tag=PAR"), after);
        }
    }
}

#[test]
fn test_tag_other_target_chromosome() {
    let fixture = Fixture::new();
    fixture
        .tag("data.gff", "tagged.gff")
        .args(["--target-chrom", "X"])
        .assert()
        .success();

    let output = fs::read_to_string(fixture.path("tagged.gff")).unwrap();
    let tagged = tagged_lines(&output);
    assert_eq!(tagged.len(), 3);
    assert!(tagged.iter().all(|line| line.starts_with(CHRX)));
}

#[test]
fn test_tag_writes_report() {
    let fixture = Fixture::new();
    fixture
        .tag("data.gff", "tagged.gff")
        .arg("--transl-file")
        .arg(fixture.path("proteins.faa"))
        .arg("--report-file")
        .arg(fixture.path("report.json"))
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fixture.path("report.json")).unwrap()).unwrap();
    assert_eq!(report["known"], serde_json::json!(["999"]));
    assert_eq!(report["inferred"], serde_json::json!(["1234"]));
    assert_eq!(report["unresolved"], serde_json::json!(["4321"]));
    assert_eq!(report["rejected"]["5678"], serde_json::json!([CHR1, CHRY]));
    assert_eq!(report["tagging"]["tagged"], 6);
}

#[test]
fn test_tag_then_filter_removes_par_copies() {
    let fixture = Fixture::new();
    fixture
        .tag("data.gff", "tagged.gff")
        .arg("--transl-file")
        .arg(fixture.path("proteins.faa"))
        .assert()
        .success();

    Command::cargo_bin("parcraft")
        .unwrap()
        .arg("filter")
        .arg("--in-data-file")
        .arg(fixture.path("tagged.gff"))
        .arg("--out-data-file")
        .arg(fixture.path("filtered.gff"))
        .assert()
        .success();

    let input = annotation();
    let filtered = fs::read_to_string(fixture.path("filtered.gff")).unwrap();
    assert_eq!(filtered.lines().count(), input.lines().count() - 6);
    assert!(tagged_lines(&filtered).is_empty());
    assert!(filtered.starts_with("##gff-version 3\n#!genome-build GRCh38.p14\n"));
}

#[test]
fn test_gzip_input_and_output() {
    let fixture = Fixture::new();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(annotation().as_bytes()).unwrap();
    fs::write(fixture.path("data.gff.gz"), encoder.finish().unwrap()).unwrap();

    fixture.tag("data.gff.gz", "tagged.gff.gz").assert().success();

    let output = read_gz(&fixture.path("tagged.gff.gz"));
    assert_eq!(tagged_lines(&output).len(), 3);
}

#[test]
fn test_missing_gene_id_fails_without_output() {
    let fixture = Fixture::new();
    fs::write(
        fixture.path("bad.gff"),
        format!("{CHRY}\tBestRefSeq\tgene\t100\t600\t.\t+\t.\tID=gene-X;Dbxref=HGNC:HGNC:1;gbkey=Gene\n"),
    )
    .unwrap();

    fixture
        .tag("bad.gff", "tagged.gff")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GeneID not found"));
    assert!(!fixture.path("tagged.gff").exists());
}

#[test]
fn test_missing_translation_fails() {
    let fixture = Fixture::new();
    fs::write(fixture.path("partial.faa"), ">NP_X1.1\nMEEL\n").unwrap();

    fixture
        .tag("data.gff", "tagged.gff")
        .arg("--transl-file")
        .arg(fixture.path("partial.faa"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in translation file"));
    assert!(!fixture.path("tagged.gff").exists());
}

#[test]
fn test_malformed_line_reports_location() {
    let fixture = Fixture::new();
    fs::write(fixture.path("bad.gff"), "##gff-version 3\nchrY\t.\tgene\n").unwrap();

    fixture
        .tag("bad.gff", "tagged.gff")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_critical_log_level_silences_warnings() {
    let fixture = Fixture::new();
    fixture
        .tag("data.gff", "tagged.gff")
        .args(["--log-level", "critical"])
        .assert()
        .success()
        .stderr(predicate::str::contains("duplicate gene ID").not());
}
