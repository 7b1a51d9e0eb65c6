use ahash::{HashMap, HashMapExt};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::SmolStr;
use tracing::info;

use crate::combine::{FlatRecord, FlatTable};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SemanticType {
    pub name: Option<SmolStr>,
    pub abbreviation: Option<SmolStr>,
}

/// A concept with all of its semantic types.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NestedRecord {
    #[serde(rename = "CUI")]
    pub cui: SmolStr,
    pub concept_name: SmolStr,
    pub semantic_type: SmallVec<[SemanticType; 2]>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NestedTable {
    pub records: Vec<NestedRecord>,
}

impl NestedTable {
    /// Group the flat rows by (CUI, concept name). Records are sorted by CUI and then name, and the
    /// semantic types in each record keep the order of the flat rows.
    ///
    /// A concept with no semantic type gets a single entry with both fields `None`, matching its
    /// single flat row.
    pub fn from_flat(flat: &FlatTable) -> NestedTable {
        let mut groups: HashMap<(&str, &str), usize> = HashMap::new();
        let mut records: Vec<NestedRecord> = Vec::new();

        for row in flat.iter() {
            let semantic_type = SemanticType {
                name: row.semantic_type_name.map(SmolStr::from),
                abbreviation: row.semantic_type_abbreviation.map(SmolStr::from),
            };

            let index = *groups.entry((row.cui, row.concept_name)).or_insert_with(|| {
                records.push(NestedRecord {
                    cui: row.cui.into(),
                    concept_name: row.concept_name.into(),
                    semantic_type: SmallVec::new(),
                });
                records.len() - 1
            });

            records[index].semantic_type.push(semantic_type);
        }

        records.sort_by(|a, b| {
            a.cui
                .cmp(&b.cui)
                .then_with(|| a.concept_name.cmp(&b.concept_name))
        });

        info!(records = records.len(), "Grouped semantic types by concept");
        NestedTable { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Expand back to one row per (concept, semantic type) pair.
    pub fn flatten(&self) -> FlatTable {
        let mut flat = FlatTable::default();
        for record in &self.records {
            for semantic_type in &record.semantic_type {
                flat.push(FlatRecord {
                    cui: &record.cui,
                    concept_name: &record.concept_name,
                    semantic_type_name: semantic_type.name.as_deref(),
                    semantic_type_abbreviation: semantic_type.abbreviation.as_deref(),
                });
            }
        }

        flat
    }
}
