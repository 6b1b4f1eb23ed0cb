use std::fs::File;
use std::io::{
    BufRead,
    BufReader
};
use std::path::Path;

use log::warn;

use crate::reader::readererror::ReaderError;

/// Column-oriented numeric table read from a `.dat` measurement file.
///
/// The first non-blank line names the columns, every following line holds
/// one whitespace-separated value per column. Text after `#` is ignored on
/// data lines; a leading `#` on the header is stripped. A value that does not
/// parse as a number is read as `NaN`, so the row is dropped later together
/// with other non-finite readings. Column names keep
/// only ASCII alphanumerics and `_`, so a header entry `Wylicz.` is looked
/// up as `Wylicz`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>
}

fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

impl DatTable {
    pub fn parse<R: BufRead>(reader: R) -> Result<DatTable, ReaderError> {
        let mut lines = reader.lines().enumerate();

        let mut names: Option<Vec<String>> = None;
        for (_, line) in lines.by_ref() {
            let line = line?;
            let header = line.trim().trim_start_matches('#').trim();
            if !header.is_empty() {
                names = Some(header.split_whitespace().map(sanitize_name).collect());
                break;
            }
        }
        let names = names.ok_or(ReaderError::EmptyTable)?;

        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
        for (index, line) in lines {
            let line = line?;
            let content = line.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            let tokens: Vec<&str> = content.split_whitespace().collect();
            if tokens.len() != names.len() {
                return Err(ReaderError::MalformedRow {
                    line: index + 1,
                    expected: names.len(),
                    found: tokens.len()
                });
            }
            for (column, token) in columns.iter_mut().zip(tokens) {
                let value = token.parse::<f64>().unwrap_or_else(|_| {
                    warn!("line {}: '{}' is not a number, read as NaN", index + 1, token);
                    f64::NAN
                });
                column.push(value);
            }
        }

        Ok(DatTable { names, columns })
    }

    pub fn from_path(path: &Path) -> Result<DatTable, ReaderError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }
}
