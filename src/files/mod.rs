use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;

use crate::error::{Error, Result};

mod find_files;

pub use find_files::{find_data_dir, InputFiles};

/// A reader over a pipe-delimited RRF file with no header row.
pub struct RrfReader {
    path: PathBuf,
    reader: csv::Reader<Box<dyn Read>>,
}

impl RrfReader {
    /// Open a file, decompressing it on the fly if the name ends in `.gz`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let input: Box<dyn Read> = if is_gzip(path) {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Self::from_reader(path, input))
    }

    /// Wrap an existing reader. `path` is only used for error messages.
    pub fn from_reader(path: impl Into<PathBuf>, input: impl Read + 'static) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            // RRF lines end with a trailing delimiter, and some files carry extra columns
            .flexible(true)
            // Strings may contain literal quote characters.
            .quoting(false)
            .from_reader(Box::new(input) as Box<dyn Read>);

        Self {
            path: path.into(),
            reader,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Call `f` for every row in the file, returning the number of rows read. Every row must
    /// have at least `min_fields` fields.
    pub fn for_each_row(
        &mut self,
        min_fields: usize,
        mut f: impl FnMut(&StringRecord),
    ) -> Result<usize> {
        let mut record = StringRecord::new();
        let mut count = 0;

        loop {
            let more = self
                .reader
                .read_record(&mut record)
                .map_err(|source| Error::Parse {
                    path: self.path.clone(),
                    source,
                })?;

            if !more {
                break;
            }

            if record.len() < min_fields {
                return Err(Error::SchemaAssumption {
                    path: self.path.clone(),
                    line: record.position().map(|p| p.line()).unwrap_or_default(),
                    expected: min_fields,
                    found: record.len(),
                });
            }

            f(&record);
            count += 1;
        }

        Ok(count)
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().map(|ext| ext == "gz").unwrap_or(false)
}
