// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tabular store adapter.
//!
//! A workbook is a directory holding one CSV file per sheet, keyed by sheet
//! name. Nothing outside this module knows the encoding: callers see named
//! sheets, whole-sheet reads, and whole-sheet replacing writes.

use std::fmt::Display;
use std::fmt::Formatter;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use csv::ReaderBuilder;
use csv::WriterBuilder;

use crate::error::ErrorReport;
use crate::types::card::Card;

/// A sheet's raw contents: a header row and data rows, all strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

#[derive(Debug)]
pub enum StoreError {
    /// The named sheet does not exist in the workbook.
    NotFound(String),
    /// The table's column layout cannot be mapped onto the card schema.
    Schema { columns: usize },
    /// The sheet name cannot be used as a store key.
    InvalidName(String),
    /// The backing file could not be read or written.
    Io(io::Error),
    Csv(csv::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(name) => {
                write!(f, "sheet '{name}' does not exist.")
            }
            StoreError::Schema { columns } => {
                write!(f, "cannot map a {columns}-column table onto the card schema.")
            }
            StoreError::InvalidName(name) => {
                write!(f, "'{name}' is not a valid sheet name.")
            }
            StoreError::Io(err) => write!(f, "{err}"),
            StoreError::Csv(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Csv(err)
    }
}

impl From<StoreError> for ErrorReport {
    fn from(err: StoreError) -> Self {
        ErrorReport::new(err.to_string())
    }
}

/// Read/write access to the named sheets of one workbook directory.
#[derive(Clone)]
pub struct Workbook {
    directory: PathBuf,
}

impl Workbook {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn sheet_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.directory.join(format!("{name}.csv")))
    }

    /// Read a sheet's entire contents. Rows shorter than the header are
    /// padded with empty cells.
    pub fn read_sheet(&self, name: &str) -> Result<Table, StoreError> {
        let path = self.sheet_path(name)?;
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let mut reader = ReaderBuilder::new().flexible(true).from_path(&path)?;
        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
            row.resize(columns.len(), String::new());
            rows.push(row);
        }
        Ok(Table { columns, rows })
    }

    /// Replace a sheet's contents wholesale. The new contents go to a
    /// temporary file that is renamed over the sheet, so a concurrent read
    /// never observes a partial write.
    pub fn write_sheet(&self, name: &str, table: &Table) -> Result<(), StoreError> {
        let path = self.sheet_path(name)?;
        let tmp_path = self.directory.join(format!(".{name}.csv.tmp"));
        {
            let mut writer = WriterBuilder::new().from_path(&tmp_path)?;
            writer.write_record(&table.columns)?;
            for row in &table.rows {
                let mut row = row.clone();
                row.resize(table.width(), String::new());
                writer.write_record(&row)?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp_path, &path)?;
        log::debug!("Wrote sheet '{name}' ({} rows).", table.rows.len());
        Ok(())
    }

    /// The names of every sheet in the workbook, sorted.
    pub fn list_sheets(&self) -> Result<Vec<String>, StoreError> {
        if !self.directory.exists() {
            return Err(StoreError::NotFound(self.directory.display().to_string()));
        }
        let mut sheets = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    if !stem.starts_with('.') {
                        sheets.push(stem.to_string());
                    }
                }
            }
        }
        sheets.sort();
        Ok(sheets)
    }
}

/// Rename a raw table's columns into the canonical card schema.
///
/// A 2-column table becomes `Question, Answer` with `default_source` as the
/// source of every row. A table of 3 or more columns keeps its first three
/// columns as `Question, Answer, Source`. Rows missing a question or an
/// answer are dropped, not errors.
pub fn normalize(table: &Table, default_source: &str) -> Result<Vec<Card>, StoreError> {
    let has_source_column = match table.width() {
        2 => false,
        n if n >= 3 => true,
        n => return Err(StoreError::Schema { columns: n }),
    };
    let mut cards = Vec::new();
    for row in &table.rows {
        let question = row.first().cloned().unwrap_or_default();
        let answer = row.get(1).cloned().unwrap_or_default();
        if question.is_empty() || answer.is_empty() {
            continue;
        }
        let source = if has_source_column {
            match row.get(2) {
                Some(cell) if !cell.is_empty() => cell.clone(),
                _ => Card::UNKNOWN_SOURCE.to_string(),
            }
        } else {
            default_source.to_string()
        };
        cards.push(Card {
            question,
            answer,
            source,
        });
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_read_missing_sheet() {
        let dir = tempdir().unwrap();
        let workbook = Workbook::new(dir.path());
        let result = workbook.read_sheet("Nope");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_invalid_sheet_name() {
        let dir = tempdir().unwrap();
        let workbook = Workbook::new(dir.path());
        assert!(matches!(
            workbook.read_sheet("../etc/passwd"),
            Err(StoreError::InvalidName(_))
        ));
        assert!(matches!(
            workbook.write_sheet("a/b", &table(&["Question", "Answer"], &[])),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let workbook = Workbook::new(dir.path());
        let contents = table(
            &["Question", "Answer"],
            &[&["2+2?", "four"], &["capital of France?", "Paris"]],
        );
        workbook.write_sheet("Numbers", &contents).unwrap();
        let read = workbook.read_sheet("Numbers").unwrap();
        assert_eq!(read, contents);
    }

    #[test]
    fn test_write_replaces_wholesale() {
        let dir = tempdir().unwrap();
        let workbook = Workbook::new(dir.path());
        workbook
            .write_sheet("S", &table(&["Question", "Answer"], &[&["a", "b"], &["c", "d"]]))
            .unwrap();
        workbook
            .write_sheet("S", &table(&["Question", "Answer"], &[&["e", "f"]]))
            .unwrap();
        let read = workbook.read_sheet("S").unwrap();
        assert_eq!(read.rows, vec![vec!["e".to_string(), "f".to_string()]]);
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Ragged.csv");
        std::fs::write(&path, "Question,Answer,Source\nq,a\n").unwrap();
        let workbook = Workbook::new(dir.path());
        let read = workbook.read_sheet("Ragged").unwrap();
        assert_eq!(
            read.rows,
            vec![vec!["q".to_string(), "a".to_string(), String::new()]]
        );
    }

    #[test]
    fn test_list_sheets() {
        let dir = tempdir().unwrap();
        let workbook = Workbook::new(dir.path());
        workbook
            .write_sheet("Unit 2", &table(&["Question", "Answer"], &[]))
            .unwrap();
        workbook
            .write_sheet("Unit 1", &table(&["Question", "Answer"], &[]))
            .unwrap();
        // Non-sheet files are ignored.
        std::fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        assert_eq!(
            workbook.list_sheets().unwrap(),
            vec!["Unit 1".to_string(), "Unit 2".to_string()]
        );
    }

    #[test]
    fn test_list_sheets_missing_directory() {
        let workbook = Workbook::new("./derpherp");
        assert!(matches!(
            workbook.list_sheets(),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_normalize_two_columns() {
        let cards = normalize(
            &table(&["Front", "Back"], &[&["q1", "a1"], &["q2", "a2"]]),
            "Unit 1 (Part 1)",
        )
        .unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0], Card::new("q1", "a1", "Unit 1 (Part 1)"));
        assert_eq!(cards[1].source, "Unit 1 (Part 1)");
    }

    #[test]
    fn test_normalize_keeps_first_three_columns() {
        let cards = normalize(
            &table(
                &["Question", "Answer", "Source", "Notes"],
                &[&["q", "a", "U1", "ignored"]],
            ),
            "default",
        )
        .unwrap();
        assert_eq!(cards, vec![Card::new("q", "a", "U1")]);
    }

    #[test]
    fn test_normalize_missing_source_defaults_to_unknown() {
        let cards = normalize(
            &table(&["Question", "Answer", "Source"], &[&["q", "a", ""]]),
            "default",
        )
        .unwrap();
        assert_eq!(cards[0].source, Card::UNKNOWN_SOURCE);
    }

    #[test]
    fn test_normalize_drops_incomplete_rows() {
        let cards = normalize(
            &table(
                &["Question", "Answer"],
                &[&["q", ""], &["", "a"], &["q2", "a2"]],
            ),
            "d",
        )
        .unwrap();
        assert_eq!(cards, vec![Card::new("q2", "a2", "d")]);
    }

    #[test]
    fn test_normalize_schema_error() {
        let result = normalize(&table(&["Question"], &[&["q"]]), "d");
        assert!(matches!(result, Err(StoreError::Schema { columns: 1 })));
    }
}
