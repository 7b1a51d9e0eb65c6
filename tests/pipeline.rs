use std::{fs, path::Path};

use itertools::Itertools;
use serde_json::Value;
use umls_semtypes::{
    error::Error,
    files::InputFiles,
    nested::NestedRecord,
    pipeline::{self, transform, Inputs, OutputPaths},
};

const MRCONSO: &str = "\
C0001|ENG|P|L1|PF|S1|Y|A1||||RXNORM|IN|161|Acetaminophen|0|N|256|
C0001|ENG|S|L2|PF|S2|Y|A2||||MSH|ET|D000082|Paracetamol|0|N|256|
C0002|ENG|P|L3|PF|S3|Y|A3||||MSH|MH|D000109|Acetylcholine|0|N|256|
C0003|SPA|P|L4|PF|S4|Y|A4||||MSHSPA|MH|D000110|Acetilcisteína|0|N|256|
C0003|ENG|P|L5|VO|S5|N|A5||||MSH|PM|D000110|Acetylcysteine, N-|0|N|256|
C0004|ENG|P|L6|PF|S6|Y|A6||||MTH|PN|NOCODE|Orphan Concept|0|N|256|
";

const MRSTY: &str = "\
C0001|T121|A1.4.1.1.1|Pharmacologic Substance|AT1|256|
C0001|T109|A1.4.1.2.1|Analgesic|AT2|256|
C0002|T109|A1.4.1.2.1|Organic Chemical|AT3|256|
C0002|T123|A1.4.1.1.3|Biologically Active Substance|AT4|256|
C0003|T121|A1.4.1.1.1|Pharmacologic Substance|AT5|256|
";

const SEMANTIC_TYPES: &str = "\
anlg||Analgesic
bacs|T123|Biologically Active Substance
orch|T109|Organic Chemical
phsu|T121|Pharmacologic Substance
";

fn write_inputs(dir: &Path, mrconso: &str, mrsty: &str, semantic_types: &str) -> InputFiles {
    let meta = dir.join("META");
    fs::create_dir_all(&meta).unwrap();
    fs::write(meta.join("MRCONSO.RRF"), mrconso).unwrap();
    fs::write(meta.join("MRSTY.RRF"), mrsty).unwrap();
    fs::write(meta.join("SemanticTypes_2018AB.txt"), semantic_types).unwrap();

    InputFiles::discover(dir).unwrap()
}

fn run(dir: &Path, files: &InputFiles) -> (String, Vec<NestedRecord>) {
    let paths = OutputPaths {
        tsv: Some(dir.join("out.tsv")),
        jsonl: Some(dir.join("out.jsonl")),
    };
    pipeline::run(files, &paths).unwrap();

    let tsv = fs::read_to_string(dir.join("out.tsv")).unwrap();
    let nested = fs::read_to_string(dir.join("out.jsonl"))
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    (tsv, nested)
}

#[test]
fn single_concept() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_inputs(
        dir.path(),
        "C0001|ENG|P|L1|PF|S1|Y|A1||||SRC|PT|1|Acetaminophen|0|N|256|\n",
        "C0001|T1|A1|Analgesic|AT1|256|\n",
        "anlg||Analgesic\n",
    );

    let (tsv, _) = run(dir.path(), &files);
    assert_eq!(
        tsv,
        "CUI\tconcept_name\tsemantic_type_name\tsemantic_type_abbreviation\n\
         C0001\tAcetaminophen\tAnalgesic\tanlg\n"
    );

    let jsonl = fs::read_to_string(dir.path().join("out.jsonl")).unwrap();
    assert_eq!(
        jsonl,
        "{\"CUI\":\"C0001\",\"concept_name\":\"Acetaminophen\",\"semantic_type\":[{\"name\":\"Analgesic\",\"abbreviation\":\"anlg\"}]}\n"
    );
}

#[test]
fn full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_inputs(dir.path(), MRCONSO, MRSTY, SEMANTIC_TYPES);
    let (tsv, nested) = run(dir.path(), &files);

    assert_eq!(
        tsv.lines().collect::<Vec<_>>(),
        vec![
            "CUI\tconcept_name\tsemantic_type_name\tsemantic_type_abbreviation",
            "C0001\tAcetaminophen\tPharmacologic Substance\tphsu",
            "C0001\tAcetaminophen\tAnalgesic\tanlg",
            "C0002\tAcetylcholine\tOrganic Chemical\torch",
            "C0002\tAcetylcholine\tBiologically Active Substance\tbacs",
            "C0004\tOrphan Concept\t\t",
        ]
    );

    let cuis = nested.iter().map(|r| r.cui.as_str()).collect::<Vec<_>>();
    assert_eq!(cuis, vec!["C0001", "C0002", "C0004"]);

    // Two semantic types become a two element list.
    assert_eq!(nested[1].concept_name, "Acetylcholine");
    assert_eq!(
        nested[1]
            .semantic_type
            .iter()
            .map(|t| t.abbreviation.as_deref().unwrap())
            .collect::<Vec<_>>(),
        vec!["orch", "bacs"]
    );

    // A concept with no semantic type keeps a null entry.
    let orphan = serde_json::to_value(&nested[2]).unwrap();
    assert_eq!(
        orphan["semantic_type"],
        serde_json::json!([{ "name": Value::Null, "abbreviation": Value::Null }])
    );
}

#[test]
fn output_properties() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_inputs(dir.path(), MRCONSO, MRSTY, SEMANTIC_TYPES);
    let inputs = Inputs::load(&files).unwrap();
    let output = transform(&inputs);

    // Every concept with a preferred name is in the flat output.
    for cui in &output.names.cui {
        assert!(output.flat.cui.contains(cui));
    }

    // Concepts without a preferred English name are dropped from both outputs.
    assert!(!output.flat.cui.iter().any(|c| c == "C0003"));
    assert!(!output.nested.records.iter().any(|r| r.cui == "C0003"));

    let distinct_names = output.names.cui.iter().unique().count();
    assert_eq!(output.nested.len(), distinct_names);

    // Flattening the nested records gives back the flat rows.
    let flattened = output.nested.flatten();
    assert_eq!(
        flattened.iter().sorted().collect::<Vec<_>>(),
        output.flat.iter().sorted().collect::<Vec<_>>()
    );
}

#[test]
fn stats() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_inputs(dir.path(), MRCONSO, MRSTY, SEMANTIC_TYPES);
    let stats = pipeline::run(&files, &OutputPaths::default()).unwrap();

    assert_eq!(stats.concept_rows, 6);
    assert_eq!(stats.concept_cuis, 4);
    assert_eq!(stats.preferred_name_cuis, 3);
    assert_eq!(stats.cuis_without_name, 1);
    assert_eq!(stats.distinct_semantic_types, 4);
    assert_eq!(stats.unmapped_semantic_types, 0);
    assert_eq!(stats.flat_rows, 5);
    assert_eq!(stats.nested_records, 3);
    assert!(!dir.path().join("out.tsv").exists());
}

#[test]
fn repeated_runs_match() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_inputs(dir.path(), MRCONSO, MRSTY, SEMANTIC_TYPES);

    let (first_tsv, first_nested) = run(dir.path(), &files);
    let (second_tsv, second_nested) = run(dir.path(), &files);
    assert_eq!(first_tsv, second_tsv);
    assert_eq!(first_nested, second_nested);
}

#[test]
fn short_mrsty_row_fails() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_inputs(dir.path(), MRCONSO, "C0001|T121|A1\n", SEMANTIC_TYPES);

    let err = pipeline::run(&files, &OutputPaths::default()).unwrap_err();
    match err {
        Error::SchemaAssumption { path, line, .. } => {
            assert_eq!(path, files.mrsty);
            assert_eq!(line, 1);
        }
        e => panic!("Unexpected error {e:?}"),
    }
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut files = write_inputs(dir.path(), MRCONSO, MRSTY, SEMANTIC_TYPES);
    files.semantic_types = dir.path().join("missing.txt");

    let err = pipeline::run(&files, &OutputPaths::default()).unwrap_err();
    assert!(matches!(err, Error::FileRead { .. }));
}

#[test]
fn crlf_and_blank_lines() {
    let unix_dir = tempfile::tempdir().unwrap();
    let unix_files = write_inputs(unix_dir.path(), MRCONSO, MRSTY, SEMANTIC_TYPES);
    let (unix_tsv, unix_nested) = run(unix_dir.path(), &unix_files);

    let crlf = |s: &str| format!("\r\n{}\r\n", s.replace('\n', "\r\n"));
    let dos_dir = tempfile::tempdir().unwrap();
    let dos_files = write_inputs(
        dos_dir.path(),
        &crlf(MRCONSO),
        &crlf(MRSTY),
        &crlf(SEMANTIC_TYPES),
    );
    let (dos_tsv, dos_nested) = run(dos_dir.path(), &dos_files);

    assert_eq!(unix_tsv, dos_tsv);
    assert_eq!(unix_nested, dos_nested);
}
