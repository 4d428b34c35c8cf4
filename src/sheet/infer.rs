//! Per-column type inference.
//!
//! A column is numeric only when every present cell in it parses as a
//! number; a single non-numeric cell turns the whole column into text.

use super::value::CellValue;

/// Cell contents read as missing, after trimming surrounding whitespace
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw cell stands for "no value"
pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// No present cells at all
    Empty,
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    /// Infer a column's kind from its cells; `None` is a cell the row lacks.
    pub fn infer<'a>(cells: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut kind = Self::Empty;
        for cell in cells.into_iter().flatten() {
            if is_missing(cell) {
                continue;
            }
            let trimmed = cell.trim();
            kind = match kind {
                Self::Empty | Self::Integer if trimmed.parse::<i64>().is_ok() => Self::Integer,
                Self::Empty | Self::Integer | Self::Float if trimmed.parse::<f64>().is_ok() => {
                    Self::Float
                }
                _ => return Self::Text,
            };
        }
        kind
    }

    /// Convert one cell of a column of this kind
    pub fn convert(self, cell: Option<&str>) -> CellValue {
        let Some(cell) = cell.filter(|c| !is_missing(c)) else {
            return CellValue::Null;
        };
        match self {
            Self::Empty => CellValue::Null,
            Self::Integer => cell
                .trim()
                .parse::<i64>()
                .map_or(CellValue::Null, CellValue::Integer),
            Self::Float => cell
                .trim()
                .parse::<f64>()
                .map_or(CellValue::Null, CellValue::float),
            Self::Text => CellValue::Text(cell.to_string()),
        }
    }
}
