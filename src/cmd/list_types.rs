use std::path::Path;

use clap::Args;
use eyre::Result;
use umls_semtypes::tables::{SemanticTypeMapping, SemanticTypeTable};

use super::InputArgs;

#[derive(Debug, Args)]
pub struct ListTypesArgs {
    #[command(flatten)]
    inputs: InputArgs,

    /// Only show types that appear in MRSTY
    #[clap(short, long)]
    used_only: bool,
}

pub fn run(base_dir: &Path, args: ListTypesArgs) -> Result<()> {
    let files = args.inputs.resolve(base_dir)?;
    let mapping = SemanticTypeMapping::load(&files.semantic_types)?;

    let mrsty = if args.used_only {
        Some(SemanticTypeTable::load(&files.mrsty)?)
    } else {
        None
    };

    for (abv, sty) in mapping.listing(mrsty.as_ref()) {
        println!("{abv} - {sty}");
    }

    Ok(())
}
