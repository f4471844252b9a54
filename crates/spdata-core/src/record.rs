//! Flat records produced by the flattener.

use std::fmt;

use serde_json::Number;

/// Separator between fields of a record's text line.
pub const FIELD_SEPARATOR: &str = ", ";

/// A scalar leaf of a JSON tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafValue {
    Number(Number),
    String(String),
    Bool(bool),
    Null,
}

impl fmt::Display for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafValue::Number(n) => write!(f, "{n}"),
            LeafValue::String(s) => f.write_str(s),
            LeafValue::Bool(b) => write!(f, "{b}"),
            LeafValue::Null => f.write_str("null"),
        }
    }
}

/// One observation: the path from a data type's root to a leaf, and the leaf.
///
/// `path_segments` excludes the data type itself and is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    pub data_type: String,
    pub path_segments: Vec<String>,
    pub leaf_value: LeafValue,
}

impl FlatRecord {
    /// Render as `data_type, seg1, …, segN, leaf`.
    ///
    /// This line is the input format of [`crate::route_line`].
    pub fn to_line(&self) -> String {
        let mut line = self.data_type.clone();
        for segment in &self.path_segments {
            line.push_str(FIELD_SEPARATOR);
            line.push_str(segment);
        }
        line.push_str(FIELD_SEPARATOR);
        line.push_str(&self.leaf_value.to_string());
        line
    }
}
