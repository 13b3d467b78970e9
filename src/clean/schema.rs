// src/clean/schema.rs

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};
use tracing::{debug, warn};

pub const SALES: &str = "Sales";
pub const DATE: &str = "Date";
pub const PRODUCT: &str = "Product";
pub const REGION: &str = "Region";

/// Logical type of a column in the cleaned table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Decimal,
    Date,
    Text,
}

/// A named, typed column the cleaned table must carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// Required columns in the order they are reported when missing.
pub const REQUIRED_COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec { name: SALES, kind: ColumnKind::Decimal },
    ColumnSpec { name: DATE, kind: ColumnKind::Date },
    ColumnSpec { name: PRODUCT, kind: ColumnKind::Text },
    ColumnSpec { name: REGION, kind: ColumnKind::Text },
];

/// Kind of a column by name; anything not required passes through as text.
pub fn kind_of(name: &str) -> ColumnKind {
    REQUIRED_COLUMNS
        .iter()
        .find(|spec| spec.name == name)
        .map(|spec| spec.kind)
        .unwrap_or(ColumnKind::Text)
}

/// Map a column kind to its Arrow type.
///
/// - Decimal → Float64
/// - Date    → Date32 (days since the Unix epoch)
/// - Text    → Utf8
pub fn map_to_arrow_type(kind: ColumnKind) -> DataType {
    match kind {
        ColumnKind::Decimal => DataType::Float64,
        ColumnKind::Date => DataType::Date32,
        ColumnKind::Text => DataType::Utf8,
    }
}

/// Schema with every column typed as text, used for the freshly loaded rows.
pub fn build_text_schema(headers: &[String]) -> SchemaRef {
    let fields: Vec<Field> = headers
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Final schema: required columns get their kind, the rest stay text.
pub fn build_arrow_schema(headers: &[String], nullable: bool) -> SchemaRef {
    let fields: Vec<Field> = headers
        .iter()
        .map(|name| Field::new(name, map_to_arrow_type(kind_of(name)), nullable))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Rename recognised alternate headers to their canonical names.
///
/// A header is only renamed when the canonical name is not already taken,
/// so the result never contains duplicates.
pub fn resolve_aliases(headers: &[String], aliases: &BTreeMap<String, String>) -> Vec<String> {
    let mut taken: HashSet<String> = headers.iter().cloned().collect();
    headers
        .iter()
        .map(|header| match aliases.get(header) {
            Some(canonical) if canonical == header => header.clone(),
            Some(canonical) if taken.contains(canonical) => {
                warn!(alias = %header, canonical = %canonical, "canonical column already present, alias left as is");
                header.clone()
            }
            Some(canonical) => {
                debug!(alias = %header, canonical = %canonical, "renaming column");
                taken.insert(canonical.clone());
                canonical.clone()
            }
            None => header.clone(),
        })
        .collect()
}

/// Required column names absent from `headers`, in required order.
pub fn missing_columns(headers: &[String]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|spec| !headers.iter().any(|h| h == spec.name))
        .map(|spec| spec.name.to_string())
        .collect()
}
