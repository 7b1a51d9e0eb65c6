use std::path::{Path, PathBuf};

use ahash::{HashSet, HashSetExt};
use tracing::{info, instrument};

use crate::{
    combine::{combine, FlatTable},
    error::Result,
    files::InputFiles,
    nested::NestedTable,
    output::{write_jsonl_file, write_tsv_file},
    tables::{ConceptTable, PreferredNameTable, SemanticTypeMapping, SemanticTypeTable},
};

/// The loaded input tables.
pub struct Inputs {
    pub concepts: ConceptTable,
    pub semantic_types: SemanticTypeTable,
    pub mapping: SemanticTypeMapping,
}

impl Inputs {
    pub fn load(files: &InputFiles) -> Result<Inputs> {
        let concepts = ConceptTable::load(&files.mrconso)?;
        let semantic_types = SemanticTypeTable::load(&files.mrsty)?;
        let mapping = SemanticTypeMapping::load(&files.semantic_types)?;

        Ok(Inputs {
            concepts,
            semantic_types,
            mapping,
        })
    }
}

/// The intermediate and final tables from a run.
pub struct Output {
    pub names: PreferredNameTable,
    pub flat: FlatTable,
    pub nested: NestedTable,
}

pub fn transform(inputs: &Inputs) -> Output {
    let names = inputs.concepts.preferred_names();
    info!(rows = names.len(), "Found preferred English names");

    let flat = combine(&names, &inputs.semantic_types, &inputs.mapping);
    let nested = NestedTable::from_flat(&flat);

    Output {
        names,
        flat,
        nested,
    }
}

pub const TSV_NAME: &str = "UMLS_CUI_Semtype.tsv";
pub const JSONL_NAME: &str = "UMLS_CUI_Semtype.jsonl";

/// Where to write each output. `None` skips that writer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub tsv: Option<PathBuf>,
    pub jsonl: Option<PathBuf>,
}

impl OutputPaths {
    /// Fill in the default file names under `dir` for any path not given. A skip flag wins over
    /// an explicit path.
    pub fn resolve(
        dir: &Path,
        tsv: Option<PathBuf>,
        jsonl: Option<PathBuf>,
        skip_tsv: bool,
        skip_jsonl: bool,
    ) -> OutputPaths {
        OutputPaths {
            tsv: (!skip_tsv).then(|| tsv.unwrap_or_else(|| dir.join(TSV_NAME))),
            jsonl: (!skip_jsonl).then(|| jsonl.unwrap_or_else(|| dir.join(JSONL_NAME))),
        }
    }
}

/// Counts describing the inputs and outputs of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub concept_rows: usize,
    pub concept_cuis: usize,
    pub preferred_name_rows: usize,
    pub preferred_name_cuis: usize,
    /// CUIs in MRCONSO with no preferred English name. These are left out of the output.
    pub cuis_without_name: usize,
    pub semantic_type_rows: usize,
    pub semantic_type_cuis: usize,
    pub distinct_semantic_types: usize,
    pub mapping_rows: usize,
    /// Semantic types used in MRSTY with no abbreviation in the mapping.
    pub unmapped_semantic_types: usize,
    pub flat_rows: usize,
    pub nested_records: usize,
}

impl RunStats {
    pub fn compute(inputs: &Inputs, output: &Output) -> RunStats {
        let concept_cuis = distinct(inputs.concepts.cui.iter().map(|c| c.as_str()));
        let preferred_name_cuis = distinct(output.names.cui.iter().map(|c| c.as_str()));

        let mapped = inputs
            .mapping
            .sty
            .iter()
            .map(|s| s.as_str())
            .collect::<HashSet<_>>();
        let used = inputs
            .semantic_types
            .sty
            .iter()
            .map(|s| s.as_str())
            .collect::<HashSet<_>>();

        RunStats {
            concept_rows: inputs.concepts.len(),
            concept_cuis,
            preferred_name_rows: output.names.len(),
            preferred_name_cuis,
            cuis_without_name: concept_cuis.saturating_sub(preferred_name_cuis),
            semantic_type_rows: inputs.semantic_types.len(),
            semantic_type_cuis: distinct(inputs.semantic_types.cui.iter().map(|c| c.as_str())),
            distinct_semantic_types: used.len(),
            mapping_rows: inputs.mapping.len(),
            unmapped_semantic_types: used.difference(&mapped).count(),
            flat_rows: output.flat.len(),
            nested_records: output.nested.len(),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    let mut seen = HashSet::new();
    for value in values {
        seen.insert(value);
    }
    seen.len()
}

/// Load the inputs, build both tables, and write whichever outputs are requested.
#[instrument(skip_all)]
pub fn run(files: &InputFiles, paths: &OutputPaths) -> Result<RunStats> {
    let inputs = Inputs::load(files)?;
    let output = transform(&inputs);

    let stats = RunStats::compute(&inputs, &output);
    info!(
        count = stats.cuis_without_name,
        "Concepts without a preferred English name"
    );

    if let Some(path) = &paths.tsv {
        write_tsv_file(&output.flat, path)?;
    }

    if let Some(path) = &paths.jsonl {
        write_jsonl_file(&output.nested, path)?;
    }

    Ok(stats)
}
