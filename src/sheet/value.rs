//! Row representation for schema-less sheets.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single normalized cell
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Float cell, with non-finite values folded to `Null`
    pub fn float(value: f64) -> Self {
        if value.is_finite() {
            Self::Float(value)
        } else {
            Self::Null
        }
    }

    #[cfg(test)]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// One sheet row: column name to value, in header order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: CellValue) {
        self.fields.push((column.into(), value));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

// Lookups only the tests need; the server just serializes records
#[cfg(test)]
impl Record {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_json() {
        assert_eq!(serde_json::to_string(&CellValue::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&CellValue::Integer(30)).unwrap(), "30");
        assert_eq!(serde_json::to_string(&CellValue::Float(1.5)).unwrap(), "1.5");
        assert_eq!(
            serde_json::to_string(&CellValue::Text("nan-ish".into())).unwrap(),
            "\"nan-ish\""
        );
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert!(CellValue::float(f64::NAN).is_null());
        assert!(CellValue::float(f64::INFINITY).is_null());
        assert_eq!(CellValue::float(2.25), CellValue::Float(2.25));
    }

    #[test]
    fn test_record_keeps_column_order() {
        let mut record = Record::with_capacity(3);
        record.push("zeta", CellValue::Integer(1));
        record.push("alpha", CellValue::Null);
        record.push("mid", CellValue::Text("x".into()));

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"zeta":1,"alpha":null,"mid":"x"}"#
        );
        assert_eq!(record.columns().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
        assert_eq!(record.get("alpha"), Some(&CellValue::Null));
        assert_eq!(record.get("missing"), None);
    }
}
