use std::path::{Path, PathBuf};

use clap::Args;
use eyre::Result;
use umls_semtypes::pipeline::{self, OutputPaths};

use super::InputArgs;

#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[arg(
        long,
        env = "UMLS_TSV_OUTPUT",
        help = "Where to write the flat TSV file. Defaults to UMLS_CUI_Semtype.tsv in the UMLS directory"
    )]
    pub tsv: Option<PathBuf>,

    #[arg(
        long,
        env = "UMLS_JSONL_OUTPUT",
        help = "Where to write the JSON lines file. Defaults to UMLS_CUI_Semtype.jsonl in the UMLS directory"
    )]
    pub jsonl: Option<PathBuf>,

    /// Don't write the TSV file
    #[arg(long)]
    pub no_tsv: bool,

    /// Don't write the JSON lines file
    #[arg(long)]
    pub no_jsonl: bool,
}

pub fn run(base_dir: &Path, args: ConvertArgs) -> Result<()> {
    let paths = OutputPaths::resolve(
        base_dir,
        args.tsv,
        args.jsonl,
        args.no_tsv,
        args.no_jsonl,
    );

    let files = args.inputs.resolve(base_dir)?;
    let stats = pipeline::run(&files, &paths)?;

    println!(
        "Wrote {} rows for {} concepts",
        stats.flat_rows, stats.nested_records
    );

    Ok(())
}
