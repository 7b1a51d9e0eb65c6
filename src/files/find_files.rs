use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const MRCONSO_NAME: &str = "MRCONSO.RRF";
pub const MRSTY_NAME: &str = "MRSTY.RRF";
pub const SEMANTIC_TYPES_NAME: &str = "SemanticTypes_2018AB.txt";

/// The three input files needed to build the concept table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFiles {
    pub mrconso: PathBuf,
    pub mrsty: PathBuf,
    pub semantic_types: PathBuf,
}

impl InputFiles {
    /// Locate the input files in or under `base_path`. Files that can't be found are given their
    /// default names in the data directory, so that the error surfaces when they are opened.
    pub fn discover(base_path: &Path) -> Result<InputFiles> {
        let dir = find_data_dir(base_path)?;

        let mrconso = find_rrf(&dir, MRCONSO_NAME);
        let mrsty = find_rrf(&dir, MRSTY_NAME);
        let semantic_types = find_semantic_types(&dir, base_path);

        Ok(InputFiles {
            mrconso,
            mrsty,
            semantic_types,
        })
    }
}

/// Find the directory containing MRCONSO, searching up to two levels under `base_path`.
pub fn find_data_dir(base_path: &Path) -> Result<PathBuf> {
    let found = recurse_dirs(base_path.to_path_buf(), 0)?;
    found.ok_or_else(|| Error::NoInputFiles {
        dir: base_path.to_path_buf(),
    })
}

fn recurse_dirs(base_dir: PathBuf, current_depth: usize) -> Result<Option<PathBuf>> {
    if contains_mrconso(&base_dir)? {
        return Ok(Some(base_dir));
    }

    if current_depth >= 2 {
        return Ok(None);
    }

    let mut contents = read_dir(&base_dir)?
        .flatten()
        .filter(|entry| entry.metadata().map(|m| m.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect::<Vec<_>>();
    contents.sort();

    for path in contents {
        if let Some(path) = recurse_dirs(path, current_depth + 1)? {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

fn contains_mrconso(path: &Path) -> Result<bool> {
    let found = read_dir(path)?.flatten().any(|entry| {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        name == MRCONSO_NAME || name == format!("{MRCONSO_NAME}.gz").as_str()
    });

    Ok(found)
}

fn read_dir(path: &Path) -> Result<std::fs::ReadDir> {
    std::fs::read_dir(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Prefer the uncompressed file, falling back to the gzipped one.
fn find_rrf(dir: &Path, name: &str) -> PathBuf {
    let plain = dir.join(name);
    if plain.exists() {
        return plain;
    }

    let gz = dir.join(format!("{name}.gz"));
    if gz.exists() {
        gz
    } else {
        plain
    }
}

/// The semantic type table isn't part of the Metathesaurus release, so it may sit in either the
/// data directory or the directory the search started from. Any `SemanticTypes*.txt` is accepted
/// if the 2018AB file isn't present.
fn find_semantic_types(data_dir: &Path, base_path: &Path) -> PathBuf {
    let candidates = [data_dir, base_path];

    for dir in candidates {
        let path = dir.join(SEMANTIC_TYPES_NAME);
        if path.exists() {
            return path;
        }
    }

    for dir in candidates {
        let Ok(contents) = std::fs::read_dir(dir) else {
            continue;
        };

        let mut found = contents
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .map(|n| n.to_string_lossy())
                    .map(|n| n.starts_with("SemanticTypes") && n.ends_with(".txt"))
                    .unwrap_or(false)
            })
            .collect::<Vec<_>>();
        found.sort();

        if let Some(path) = found.pop() {
            return path;
        }
    }

    data_dir.join(SEMANTIC_TYPES_NAME)
}
