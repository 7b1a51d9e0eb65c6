use std::path::Path;

use smol_str::SmolStr;
use tracing::{debug, info};

use super::field;
use crate::{error::Result, files::RrfReader};

const CUI_IDX: usize = 0;
const LAT_IDX: usize = 1;
const TS_IDX: usize = 2;
const STT_IDX: usize = 4;
const ISPREF_IDX: usize = 6;
const STR_IDX: usize = 14;

/// The columns of MRCONSO that identify the preferred name of a concept. Each row is one atom,
/// so a CUI appears many times.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConceptTable {
    pub cui: Vec<SmolStr>,
    /// Language of terms
    pub lat: Vec<SmolStr>,
    /// Term status
    pub ts: Vec<SmolStr>,
    /// String type
    pub stt: Vec<SmolStr>,
    /// Atom status, "Y" if this is the preferred atom of its string within the concept.
    pub ispref: Vec<SmolStr>,
    pub string: Vec<SmolStr>,
}

/// A single row of a [ConceptTable].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConceptRecord<'a> {
    pub cui: &'a str,
    pub lat: &'a str,
    pub ts: &'a str,
    pub stt: &'a str,
    pub ispref: &'a str,
    pub string: &'a str,
}

impl<'a> ConceptRecord<'a> {
    /// The flags from the UMLS "preferred atom" query: preferred LUI of the CUI, preferred form
    /// of the term, preferred atom of the string, and English.
    pub fn is_preferred_english(&self) -> bool {
        self.ts == "P" && self.stt == "PF" && self.ispref == "Y" && self.lat == "ENG"
    }
}

impl ConceptTable {
    pub fn load(path: &Path) -> Result<ConceptTable> {
        let reader = RrfReader::open(path)?;
        Self::read(reader)
    }

    pub fn read(mut reader: RrfReader) -> Result<ConceptTable> {
        let mut table = ConceptTable::default();

        let rows = reader.for_each_row(STR_IDX + 1, |line| {
            table.cui.push(field(line, CUI_IDX));
            table.lat.push(field(line, LAT_IDX));
            table.ts.push(field(line, TS_IDX));
            table.stt.push(field(line, STT_IDX));
            table.ispref.push(field(line, ISPREF_IDX));
            table.string.push(field(line, STR_IDX));
        })?;

        info!(path = %reader.path().display(), rows, "Loaded concepts");
        Ok(table)
    }

    pub fn push(&mut self, record: ConceptRecord) {
        self.cui.push(record.cui.into());
        self.lat.push(record.lat.into());
        self.ts.push(record.ts.into());
        self.stt.push(record.stt.into());
        self.ispref.push(record.ispref.into());
        self.string.push(record.string.into());
    }

    pub fn len(&self) -> usize {
        self.cui.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cui.is_empty()
    }

    pub fn get(&self, i: usize) -> ConceptRecord<'_> {
        ConceptRecord {
            cui: &self.cui[i],
            lat: &self.lat[i],
            ts: &self.ts[i],
            stt: &self.stt[i],
            ispref: &self.ispref[i],
            string: &self.string[i],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ConceptRecord<'_>> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    /// Keep only the rows that hold the preferred English name of their concept.
    pub fn preferred_english(&self) -> ConceptTable {
        let mut output = ConceptTable::default();
        for record in self.iter().filter(|r| r.is_preferred_english()) {
            output.push(record);
        }

        debug!(
            input = self.len(),
            output = output.len(),
            "Filtered preferred English atoms"
        );
        output
    }

    /// Filter to preferred English atoms and project to (CUI, STR).
    pub fn preferred_names(&self) -> PreferredNameTable {
        let preferred = self.preferred_english();
        PreferredNameTable {
            cui: preferred.cui,
            name: preferred.string,
        }
    }
}

/// The preferred English name for each concept that has one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PreferredNameTable {
    pub cui: Vec<SmolStr>,
    pub name: Vec<SmolStr>,
}

impl PreferredNameTable {
    pub fn len(&self) -> usize {
        self.cui.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cui.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.cui
            .iter()
            .zip(self.name.iter())
            .map(|(cui, name)| (cui.as_str(), name.as_str()))
    }
}
