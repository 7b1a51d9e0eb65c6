//! Column-oriented tables holding the parts of the UMLS files the pipeline uses.
//!
//! Each table keeps one `Vec` per column rather than a `Vec` of row structs, mostly so that the
//! filter can scan the flag columns without touching the strings. Short values such as CUIs and
//! flags fit inline in a [SmolStr] and don't need their own allocation.

use smol_str::SmolStr;

mod concepts;
mod semantic_types;

pub use concepts::{ConceptRecord, ConceptTable, PreferredNameTable};
pub use semantic_types::{SemanticTypeMapping, SemanticTypeTable};

pub(crate) fn field(record: &csv::StringRecord, index: usize) -> SmolStr {
    SmolStr::from(record.get(index).unwrap_or_default())
}
