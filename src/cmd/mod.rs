mod convert;
mod list_types;
mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use umls_semtypes::files::InputFiles;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    #[arg(
        short,
        long,
        env = "UMLS_DIR",
        default_value = ".",
        help = "The directory containing the UMLS files"
    )]
    pub dir: PathBuf,

    /// Show debug logging. RUST_LOG overrides this.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the concept table as TSV and JSON lines
    Convert(convert::ConvertArgs),
    /// Print row counts for the inputs and outputs
    Stats(InputArgs),
    /// List the semantic types and their abbreviations
    ListTypes(list_types::ListTypesArgs),
}

/// Paths to the individual input files, overriding the ones found in the data directory.
#[derive(clap::Args, Debug, Default)]
pub struct InputArgs {
    #[arg(long, env = "UMLS_MRCONSO", help = "Path to MRCONSO.RRF")]
    pub mrconso: Option<PathBuf>,

    #[arg(long, env = "UMLS_MRSTY", help = "Path to MRSTY.RRF")]
    pub mrsty: Option<PathBuf>,

    #[arg(
        long,
        env = "UMLS_SEMANTIC_TYPES",
        help = "Path to the semantic type abbreviation table, e.g. SemanticTypes_2018AB.txt"
    )]
    pub semantic_types: Option<PathBuf>,
}

impl InputArgs {
    pub fn resolve(self, dir: &std::path::Path) -> Result<InputFiles> {
        let files = match (self.mrconso, self.mrsty, self.semantic_types) {
            (Some(mrconso), Some(mrsty), Some(semantic_types)) => InputFiles {
                mrconso,
                mrsty,
                semantic_types,
            },
            (mrconso, mrsty, semantic_types) => {
                let found = InputFiles::discover(dir)?;
                InputFiles {
                    mrconso: mrconso.unwrap_or(found.mrconso),
                    mrsty: mrsty.unwrap_or(found.mrsty),
                    semantic_types: semantic_types.unwrap_or(found.semantic_types),
                }
            }
        };

        Ok(files)
    }
}

pub fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Convert(convert_args) => convert::run(&args.dir, convert_args),
        Command::Stats(input_args) => stats::run(&args.dir, input_args),
        Command::ListTypes(list_args) => list_types::run(&args.dir, list_args),
    }
}
