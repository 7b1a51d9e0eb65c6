use std::path::Path;

use ahash::{HashMap, HashMapExt, HashSet};
use itertools::Itertools;
use smallvec::SmallVec;
use smol_str::SmolStr;
use tracing::info;

use super::field;
use crate::{error::Result, files::RrfReader};

/// (CUI, STY) pairs from MRSTY. A concept may have more than one semantic type.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SemanticTypeTable {
    pub cui: Vec<SmolStr>,
    pub sty: Vec<SmolStr>,
}

impl SemanticTypeTable {
    pub fn load(path: &Path) -> Result<SemanticTypeTable> {
        let reader = RrfReader::open(path)?;
        Self::read(reader)
    }

    pub fn read(mut reader: RrfReader) -> Result<SemanticTypeTable> {
        let mut table = SemanticTypeTable::default();
        let rows = reader.for_each_row(4, |line| {
            table.cui.push(field(line, 0));
            table.sty.push(field(line, 3));
        })?;

        info!(path = %reader.path().display(), rows, "Loaded semantic types");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.cui.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cui.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.cui
            .iter()
            .zip(self.sty.iter())
            .map(|(cui, sty)| (cui.as_str(), sty.as_str()))
    }
}

/// The semantic type abbreviation table, (ABV, STY) pairs. This comes from the MetaMap
/// `SemanticTypes_*.txt` file, formatted as `abbreviation|TUI|full name`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SemanticTypeMapping {
    pub abv: Vec<SmolStr>,
    pub sty: Vec<SmolStr>,
}

impl SemanticTypeMapping {
    pub fn load(path: &Path) -> Result<SemanticTypeMapping> {
        let reader = RrfReader::open(path)?;
        Self::read(reader)
    }

    pub fn read(mut reader: RrfReader) -> Result<SemanticTypeMapping> {
        let mut table = SemanticTypeMapping::default();
        let rows = reader.for_each_row(3, |line| {
            table.abv.push(field(line, 0));
            table.sty.push(field(line, 2));
        })?;

        info!(path = %reader.path().display(), rows, "Loaded semantic type mapping");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.abv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abv.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.abv
            .iter()
            .zip(self.sty.iter())
            .map(|(abv, sty)| (abv.as_str(), sty.as_str()))
    }

    /// Map each full name to the rows that carry it. The file has one row per name, but this
    /// doesn't assume so.
    pub fn by_name(&self) -> HashMap<&str, SmallVec<[u32; 1]>> {
        let mut lookup: HashMap<&str, SmallVec<[u32; 1]>> = HashMap::with_capacity(self.len());
        for (i, sty) in self.sty.iter().enumerate() {
            lookup.entry(sty.as_str()).or_default().push(i as u32);
        }
        lookup
    }

    /// (ABV, STY) pairs sorted by full name. When `used` is given, only types that appear in it
    /// are listed.
    pub fn listing(&self, used: Option<&SemanticTypeTable>) -> Vec<(&str, &str)> {
        let used = used.map(|table| {
            table
                .sty
                .iter()
                .map(|s| s.as_str())
                .collect::<HashSet<_>>()
        });

        self.iter()
            .filter(|(_, sty)| used.as_ref().map(|u| u.contains(sty)).unwrap_or(true))
            .sorted_by(|(_, a), (_, b)| a.cmp(b))
            .collect()
    }
}
