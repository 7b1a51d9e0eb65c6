use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use itertools::Itertools;
use serde::Serialize;
use smallvec::SmallVec;
use smol_str::SmolStr;
use tracing::{debug, info, warn};

use crate::tables::{PreferredNameTable, SemanticTypeMapping, SemanticTypeTable};

/// One row per (CUI, semantic type) pair. The semantic type columns are `None` when the concept
/// has no semantic type, and the abbreviation is `None` when the type is missing from the mapping.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlatTable {
    pub cui: Vec<SmolStr>,
    pub concept_name: Vec<SmolStr>,
    pub semantic_type_name: Vec<Option<SmolStr>>,
    pub semantic_type_abbreviation: Vec<Option<SmolStr>>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlatRecord<'a> {
    #[serde(rename = "CUI")]
    pub cui: &'a str,
    pub concept_name: &'a str,
    pub semantic_type_name: Option<&'a str>,
    pub semantic_type_abbreviation: Option<&'a str>,
}

impl FlatTable {
    pub const COLUMNS: [&'static str; 4] = [
        "CUI",
        "concept_name",
        "semantic_type_name",
        "semantic_type_abbreviation",
    ];

    pub fn len(&self) -> usize {
        self.cui.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cui.is_empty()
    }

    pub fn push(&mut self, record: FlatRecord) {
        self.cui.push(record.cui.into());
        self.concept_name.push(record.concept_name.into());
        self.semantic_type_name
            .push(record.semantic_type_name.map(SmolStr::from));
        self.semantic_type_abbreviation
            .push(record.semantic_type_abbreviation.map(SmolStr::from));
    }

    pub fn get(&self, i: usize) -> FlatRecord<'_> {
        FlatRecord {
            cui: &self.cui[i],
            concept_name: &self.concept_name[i],
            semantic_type_name: self.semantic_type_name[i].as_deref(),
            semantic_type_abbreviation: self.semantic_type_abbreviation[i].as_deref(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = FlatRecord<'_>> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }
}

/// MRSTY left joined with the abbreviation mapping on STY.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConceptSemanticTypes {
    pub cui: Vec<SmolStr>,
    pub sty: Vec<SmolStr>,
    pub abv: Vec<Option<SmolStr>>,
}

impl ConceptSemanticTypes {
    pub fn len(&self) -> usize {
        self.cui.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cui.is_empty()
    }
}

/// Attach an abbreviation to each (CUI, STY) row. Rows whose STY has no mapping keep a `None`
/// abbreviation, and a duplicated mapping entry produces one row per match.
pub fn join_abbreviations(
    semantic_types: &SemanticTypeTable,
    mapping: &SemanticTypeMapping,
) -> ConceptSemanticTypes {
    let lookup = mapping.by_name();
    let mut output = ConceptSemanticTypes::default();
    let mut unmapped = HashSet::new();

    for (cui, sty) in semantic_types.iter() {
        match lookup.get(sty) {
            Some(rows) => {
                for &row in rows {
                    output.cui.push(cui.into());
                    output.sty.push(sty.into());
                    output.abv.push(Some(mapping.abv[row as usize].clone()));
                }
            }
            None => {
                unmapped.insert(sty);
                output.cui.push(cui.into());
                output.sty.push(sty.into());
                output.abv.push(None);
            }
        }
    }

    for sty in unmapped.into_iter().sorted() {
        warn!(semantic_type = %sty, "No abbreviation found for semantic type");
    }

    debug!(rows = output.len(), "Joined semantic type abbreviations");
    output
}

/// Left join the preferred names with the concept semantic types on CUI.
///
/// The output is sorted by CUI. Rows that share a CUI come in the order of the preferred name rows,
/// and then in the original MRSTY order.
pub fn join_names(names: &PreferredNameTable, types: &ConceptSemanticTypes) -> FlatTable {
    let mut by_cui: HashMap<&str, SmallVec<[u32; 2]>> = HashMap::with_capacity(types.len());
    for (i, cui) in types.cui.iter().enumerate() {
        by_cui.entry(cui.as_str()).or_default().push(i as u32);
    }

    let mut order = (0..names.len()).collect::<Vec<_>>();
    // Stable, so that duplicate CUIs keep their input order.
    order.sort_by(|&a, &b| names.cui[a].cmp(&names.cui[b]));

    let mut output = FlatTable::default();
    let mut seen = HashSet::with_capacity(names.len());
    let mut missing_types = 0usize;

    for i in order {
        let cui = &names.cui[i];
        let name = &names.name[i];

        if !seen.insert(cui.as_str()) {
            warn!(%cui, %name, "Concept has more than one preferred English name");
        }

        match by_cui.get(cui.as_str()) {
            Some(rows) => {
                for &row in rows {
                    let row = row as usize;
                    output.cui.push(cui.clone());
                    output.concept_name.push(name.clone());
                    output.semantic_type_name.push(Some(types.sty[row].clone()));
                    output
                        .semantic_type_abbreviation
                        .push(types.abv[row].clone());
                }
            }
            None => {
                missing_types += 1;
                debug!(%cui, "Concept has no semantic type");
                output.cui.push(cui.clone());
                output.concept_name.push(name.clone());
                output.semantic_type_name.push(None);
                output.semantic_type_abbreviation.push(None);
            }
        }
    }

    if missing_types > 0 {
        warn!(count = missing_types, "Concepts with no semantic type");
    }

    output
}

/// Build the flat concept table from the three loaded inputs.
pub fn combine(
    names: &PreferredNameTable,
    semantic_types: &SemanticTypeTable,
    mapping: &SemanticTypeMapping,
) -> FlatTable {
    let types = join_abbreviations(semantic_types, mapping);
    let flat = join_names(names, &types);
    info!(rows = flat.len(), "Combined concept table");
    flat
}
