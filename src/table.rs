use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::LpsnError;
use crate::store::write_bytes_atomic;

/// A header row plus string cells. Empty cells stand for missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Index of `name`, appending an empty column when it is absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column(name) {
            return index;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn read_csv(path: &Path) -> Result<Self, LpsnError> {
        let file = File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => LpsnError::MissingInput(path.to_path_buf()),
            _ => LpsnError::Filesystem(format!("open {}: {err}", path.display())),
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, LpsnError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|err| LpsnError::Csv(err.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();
        let mut table = Table::new(headers);
        for record in reader.records() {
            let record = record.map_err(|err| LpsnError::Csv(err.to_string()))?;
            // short rows are padded; long ones would silently lose cells
            if record.len() > table.headers.len() {
                let line = record.position().map(|pos| pos.line()).unwrap_or_default();
                return Err(LpsnError::Csv(format!(
                    "line {line}: expected {} fields, saw {}",
                    table.headers.len(),
                    record.len()
                )));
            }
            table.push_row(record.iter().map(str::to_string).collect());
        }
        Ok(table)
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, LpsnError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&self.headers)
            .map_err(|err| LpsnError::Csv(err.to_string()))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|err| LpsnError::Csv(err.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|err| LpsnError::Csv(err.to_string()))
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), LpsnError> {
        write_bytes_atomic(path, &self.to_csv_bytes()?)
    }
}
