//! CSV body to records.

use std::collections::{HashMap, HashSet};

use csv::{ReaderBuilder, StringRecord};

use super::error::SheetError;
use super::infer::ColumnKind;
use super::value::Record;

/// Parse a CSV document whose first row is the header.
///
/// Rows keep source order and fields keep header order. Rows shorter than
/// the header are padded with nulls; longer rows are an error.
pub fn parse_records(body: &str) -> Result<Vec<Record>, SheetError> {
    let body = body.strip_prefix('\u{feff}').unwrap_or(body);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let raw_headers = reader.headers()?.clone();
    if raw_headers.is_empty() {
        return Err(SheetError::NoColumns);
    }
    let headers = normalize_headers(&raw_headers);

    let mut rows: Vec<StringRecord> = Vec::new();
    for result in reader.records() {
        let row = result?;
        if is_blank_line(&row) {
            continue;
        }
        if row.len() > headers.len() {
            return Err(SheetError::FieldCount {
                line: row.position().map_or(0, csv::Position::line),
                expected: headers.len(),
                found: row.len(),
            });
        }
        rows.push(row);
    }

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|col| ColumnKind::infer(rows.iter().map(|row| row.get(col))))
        .collect();

    let records = rows
        .iter()
        .map(|row| {
            let mut record = Record::with_capacity(headers.len());
            for (col, (name, kind)) in headers.iter().zip(&kinds).enumerate() {
                record.push(name.clone(), kind.convert(row.get(col)));
            }
            record
        })
        .collect();

    Ok(records)
}

fn is_blank_line(row: &StringRecord) -> bool {
    row.len() == 1 && row.get(0).is_some_and(str::is_empty)
}

/// Name unnamed columns by position and suffix repeated names with `.1`, `.2`, ...
fn normalize_headers(raw: &StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(raw.len());

    for (idx, header) in raw.iter().enumerate() {
        let base = if header.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header.to_string()
        };

        let name = if seen.contains(&base) {
            let counter = suffixes.entry(base.clone()).or_insert(0);
            loop {
                *counter += 1;
                let candidate = format!("{base}.{counter}");
                if !seen.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            base
        };

        seen.insert(name.clone());
        names.push(name);
    }

    names
}
