use std::path::Path;

use eyre::Result;
use umls_semtypes::pipeline::{transform, Inputs, RunStats};

use super::InputArgs;

pub fn run(dir: &Path, args: InputArgs) -> Result<()> {
    let files = args.resolve(dir)?;
    let inputs = Inputs::load(&files)?;
    let output = transform(&inputs);
    let stats = RunStats::compute(&inputs, &output);

    println!("MRCONSO rows: {}", stats.concept_rows);
    println!("MRCONSO CUIs: {}", stats.concept_cuis);
    println!("Preferred English names: {}", stats.preferred_name_rows);
    println!("CUIs with a preferred English name: {}", stats.preferred_name_cuis);
    println!("CUIs without a preferred English name: {}", stats.cuis_without_name);
    println!("MRSTY rows: {}", stats.semantic_type_rows);
    println!("MRSTY CUIs: {}", stats.semantic_type_cuis);
    println!("Semantic types in MRSTY: {}", stats.distinct_semantic_types);
    println!("Semantic type mapping rows: {}", stats.mapping_rows);
    println!("Semantic types without an abbreviation: {}", stats.unmapped_semantic_types);
    println!("Flat rows: {}", stats.flat_rows);
    println!("Nested records: {}", stats.nested_records);

    Ok(())
}
