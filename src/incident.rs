//! Incident sink: append-only delimited incident store.
//!
//! Every fired incident becomes exactly one immutable record appended to a
//! delimited tabular file. A header row is written when the store is newly
//! created. Records are never rewritten or deleted; the store is single
//! writer, owned by the decision loop. Append failures propagate to the
//! caller: silently losing a safety incident record is unacceptable.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context as _, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::context::Location;
use crate::decision::IncidentCondition;

/// Header row written when the store file is created.
pub const STORE_HEADER: &str = "Date,Time,Incident Type,Location,Coordinates";

/// Sink for fired incidents.
///
/// The pipeline appends through this seam, so stores can be substituted in
/// tests. Implementations must surface append failures to the caller; a
/// silent no-op is a contract violation.
pub trait IncidentSink: Send {
    fn append(
        &mut self,
        condition: &IncidentCondition,
        location: &Location,
    ) -> Result<IncidentRecord>;
}

/// One persisted incident. Immutable once written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// ISO date, e.g. "2026-08-26".
    pub date: String,
    /// Local time at second precision, e.g. "21:14:03".
    pub time: String,
    /// Human-readable condition label.
    pub label: String,
    pub city: String,
    /// (latitude, longitude) when known.
    pub coordinates: Option<(f64, f64)>,
}

/// Append-only store backed by a delimited file.
pub struct CsvIncidentStore {
    path: PathBuf,
    file: File,
}

impl CsvIncidentStore {
    /// Open (or create) the store for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open incident store {}", path.display()))?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_record(&mut self, record: &IncidentRecord) -> Result<()> {
        let needs_header = self
            .file
            .metadata()
            .with_context(|| format!("stat incident store {}", self.path.display()))?
            .len()
            == 0;

        let mut buf = String::new();
        if needs_header {
            buf.push_str(STORE_HEADER);
            buf.push('\n');
        }
        buf.push_str(&format_row(record));
        buf.push('\n');

        self.file
            .write_all(buf.as_bytes())
            .with_context(|| format!("append to incident store {}", self.path.display()))?;
        self.file
            .flush()
            .with_context(|| format!("flush incident store {}", self.path.display()))?;
        Ok(())
    }
}

impl IncidentSink for CsvIncidentStore {
    /// Append one record for a fired condition.
    ///
    /// Timestamps are taken from the local clock at the moment of writing and
    /// split into date and time fields. The header row is written first when
    /// the store is empty. The file is flushed before returning.
    fn append(
        &mut self,
        condition: &IncidentCondition,
        location: &Location,
    ) -> Result<IncidentRecord> {
        let now = Local::now();
        let record = IncidentRecord {
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M:%S").to_string(),
            label: condition.label(),
            city: location.city.clone(),
            coordinates: location.coordinates,
        };
        self.append_record(&record)?;
        Ok(record)
    }
}

/// Read the whole store back, verifying and skipping the header row.
pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<IncidentRecord>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read incident store {}", path.display()))?;

    let mut records = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        if idx == 0 {
            // A store written by this kernel always starts with the header.
            // Anything else means the first record would be misread as one.
            if line != STORE_HEADER {
                return Err(anyhow!(
                    "incident store {} has no header row (found {:?})",
                    path.display(),
                    line
                ));
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }
        records.push(parse_row(line).with_context(|| {
            format!("malformed incident store row {} in {}", idx + 1, path.display())
        })?);
    }
    Ok(records)
}

fn format_row(record: &IncidentRecord) -> String {
    let coordinates = match record.coordinates {
        Some((lat, lon)) => format!("[{}, {}]", lat, lon),
        None => String::new(),
    };
    [
        record.date.as_str(),
        record.time.as_str(),
        record.label.as_str(),
        record.city.as_str(),
        coordinates.as_str(),
    ]
    .iter()
    .map(|field| escape_field(field))
    .collect::<Vec<_>>()
    .join(",")
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn parse_row(line: &str) -> Result<IncidentRecord> {
    let fields = split_fields(line)?;
    if fields.len() != 5 {
        return Err(anyhow!("expected 5 fields, found {}", fields.len()));
    }
    let coordinates = parse_coordinates(&fields[4])?;
    Ok(IncidentRecord {
        date: fields[0].clone(),
        time: fields[1].clone(),
        label: fields[2].clone(),
        city: fields[3].clone(),
        coordinates,
    })
}

fn split_fields(line: &str) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if in_quotes {
        return Err(anyhow!("unterminated quoted field"));
    }
    fields.push(current);
    Ok(fields)
}

fn parse_coordinates(field: &str) -> Result<Option<(f64, f64)>> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| anyhow!("coordinates must look like [lat, lon], got {:?}", field))?;
    let mut parts = inner.splitn(2, ',');
    let lat = parts
        .next()
        .ok_or_else(|| anyhow!("missing latitude in {:?}", field))?
        .trim()
        .parse::<f64>()
        .map_err(|e| anyhow!("bad latitude in {:?}: {}", field, e))?;
    let lon = parts
        .next()
        .ok_or_else(|| anyhow!("missing longitude in {:?}", field))?
        .trim()
        .parse::<f64>()
        .map_err(|e| anyhow!("bad longitude in {:?}: {}", field, e))?;
    Ok(Some((lat, lon)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_round_trips_with_coordinates() {
        let record = IncidentRecord {
            date: "2026-08-26".to_string(),
            time: "21:14:03".to_string(),
            label: "1 Female with 3 Males".to_string(),
            city: "São Paulo".to_string(),
            coordinates: Some((-23.5505, -46.6333)),
        };
        let row = format_row(&record);
        // Coordinates contain a comma, so the field must be quoted.
        assert!(row.contains("\"[-23.5505, -46.6333]\""));
        assert_eq!(parse_row(&row).unwrap(), record);
    }

    #[test]
    fn row_round_trips_without_coordinates() {
        let record = IncidentRecord {
            date: "2026-08-26".to_string(),
            time: "02:00:00".to_string(),
            label: "Woman Alone at Night".to_string(),
            city: "Unknown".to_string(),
            coordinates: None,
        };
        let row = format_row(&record);
        assert!(row.ends_with(','));
        assert_eq!(parse_row(&row).unwrap(), record);
    }

    #[test]
    fn embedded_quotes_and_commas_survive() {
        let record = IncidentRecord {
            date: "2026-08-26".to_string(),
            time: "12:00:00".to_string(),
            label: "SOS Gesture Detected".to_string(),
            city: "Washington, D.C. \"the District\"".to_string(),
            coordinates: None,
        };
        let row = format_row(&record);
        assert_eq!(parse_row(&row).unwrap(), record);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(parse_row("a,b,c").is_err());
    }

    #[test]
    fn rejects_garbage_coordinates() {
        assert!(parse_coordinates("12.5, 13.5").is_err());
        assert!(parse_coordinates("[12.5]").is_err());
        assert!(parse_coordinates("[x, y]").is_err());
        assert_eq!(parse_coordinates("").unwrap(), None);
    }
}
