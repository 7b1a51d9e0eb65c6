use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use csv::{QuoteStyle, WriterBuilder};
use tracing::info;

use crate::{
    combine::FlatTable,
    error::{Error, Result},
    nested::NestedTable,
};

/// Write the flat table as tab-separated values with a header row. Values are written as-is, and
/// missing semantic types are written as empty fields.
pub fn write_tsv(flat: &FlatTable, output: impl Write) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .has_headers(false)
        .from_writer(output);

    // Written separately so that an empty table still gets a header.
    writer.write_record(FlatTable::COLUMNS)?;
    for record in flat.iter() {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write each nested record as one JSON object per line.
///
/// Strings are written as UTF-8. pandas' `to_json` escapes non-ASCII characters as `\uXXXX` by
/// default, so the bytes can differ from files produced that way even though the JSON values are
/// the same.
pub fn write_jsonl(nested: &NestedTable, mut output: impl Write) -> Result<()> {
    for record in &nested.records {
        serde_json::to_writer(&mut output, record)?;
        output.write_all(b"\n")?;
    }

    output.flush()?;
    Ok(())
}

pub fn write_tsv_file(flat: &FlatTable, path: &Path) -> Result<()> {
    let writer = create_file(path)?;
    write_tsv(flat, writer).map_err(|e| with_path(path, e))?;
    info!(path = %path.display(), rows = flat.len(), "Wrote TSV");
    Ok(())
}

pub fn write_jsonl_file(nested: &NestedTable, path: &Path) -> Result<()> {
    let writer = create_file(path)?;
    write_jsonl(nested, writer).map_err(|e| with_path(path, e))?;
    info!(path = %path.display(), records = nested.len(), "Wrote JSON lines");
    Ok(())
}

/// Attach the output path to an error raised while writing.
fn with_path(path: &Path, err: Error) -> Error {
    let source = match err {
        Error::Io(source) => source,
        Error::Csv(e) => e.into(),
        Error::Json(e) => e.into(),
        err => return err,
    };

    Error::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    let write_error = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    let file = File::create(path).map_err(write_error)?;
    Ok(BufWriter::new(file))
}
