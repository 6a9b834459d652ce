use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::UpdateOptions;
use crate::domain::{GenusRecord, Rank};
use crate::error::LpsnError;
use crate::registry::Registry;
use crate::table::Table;

/// Join key in the user table.
pub const GENUS_COLUMN: &str = "Genus(G)";

/// Ranks overwritten on matched rows.
pub const UPDATED_RANKS: [Rank; 5] = [
    Rank::Domain,
    Rank::Phylum,
    Rank::Class,
    Rank::Order,
    Rank::Family,
];

#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub rows: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub outfile: String,
    pub notfound_file: Option<String>,
    pub map_file: Option<String>,
}

/// Result of matching a user table against the registry, before anything
/// is written.
#[derive(Debug, Clone)]
pub struct TaxonUpdate {
    pub updated: Table,
    pub notfound: Table,
    pub map: Table,
}

impl TaxonUpdate {
    pub fn matched(&self) -> usize {
        self.updated.len() - self.notfound.len()
    }
}

pub struct TaxonUpdater<'a> {
    registry: &'a Registry,
}

impl<'a> TaxonUpdater<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Reads `options.infile`, writes the updated table and any side files.
    pub fn update(&self, options: &UpdateOptions) -> Result<UpdateReport, LpsnError> {
        let input = Table::read_csv(&options.infile)?;
        let genus_column = input
            .column(GENUS_COLUMN)
            .ok_or_else(|| LpsnError::MissingColumn {
                column: GENUS_COLUMN.to_string(),
                path: options.infile.clone(),
            })?;
        let result = self.apply(input, genus_column);

        if let Some(map_file) = &options.map_file {
            result.map.write_csv(map_file)?;
            info!(path = %map_file.display(), rows = result.map.len(), "wrote join map");
        }

        result.updated.write_csv(&options.outfile)?;
        info!(
            path = %options.outfile.display(),
            rows = result.updated.len(),
            matched = result.matched(),
            "wrote updated taxon table"
        );

        let notfound_file = if result.notfound.is_empty() {
            None
        } else {
            let path = options.notfound_path();
            warn!(
                count = result.notfound.len(),
                infile = %options.infile.display(),
                "rows not found in LPSN"
            );
            result.notfound.write_csv(&path)?;
            Some(path.display().to_string())
        };

        Ok(UpdateReport {
            rows: result.updated.len(),
            matched: result.matched(),
            unmatched: result.notfound.len(),
            outfile: options.outfile.display().to_string(),
            notfound_file,
            map_file: options
                .map_file
                .as_ref()
                .map(|path| path.display().to_string()),
        })
    }

    /// Left-joins `input` on its genus column and overwrites the five higher
    /// ranks of matched rows. Row count and order never change.
    pub fn apply(&self, input: Table, genus_column: usize) -> TaxonUpdate {
        let index = self.registry.genus_index();
        let map = self.join_map(&input, genus_column, &index);

        let mut notfound = Table::new(input.headers.clone());
        let mut updated = input;
        let targets: Vec<(usize, Rank)> = UPDATED_RANKS
            .iter()
            .map(|rank| (updated.ensure_column(&rank.taxon_column()), *rank))
            .collect();
        let original_width = notfound.headers.len();

        for row in &mut updated.rows {
            let genus = row.get(genus_column).map(String::as_str).unwrap_or("");
            match index.get(genus).and_then(|records| records.first()) {
                Some(record) => {
                    for (column, rank) in &targets {
                        row[*column] = record
                            .get(*rank)
                            .map(|name| name.as_str().to_string())
                            .unwrap_or_default();
                    }
                }
                None => notfound.push_row(row[..original_width].to_vec()),
            }
        }

        TaxonUpdate {
            updated,
            notfound,
            map,
        }
    }

    fn join_map(
        &self,
        input: &Table,
        genus_column: usize,
        index: &HashMap<&str, Vec<&GenusRecord>>,
    ) -> Table {
        let registry_headers: Vec<String> = self
            .registry
            .columns()
            .iter()
            .map(|rank| rank.to_string())
            .collect();

        let mut headers: Vec<String> = input
            .headers
            .iter()
            .map(|header| suffixed(header, &registry_headers, "_x"))
            .collect();
        headers.extend(
            registry_headers
                .iter()
                .map(|header| suffixed(header, &input.headers, "_y")),
        );

        let mut map = Table::new(headers);
        let empty = vec![String::new(); registry_headers.len()];
        for row in &input.rows {
            let genus = row.get(genus_column).map(String::as_str).unwrap_or("");
            match index.get(genus) {
                Some(records) => {
                    for record in records {
                        let mut joined = row.clone();
                        joined.extend(self.registry.row_cells(record));
                        map.push_row(joined);
                    }
                }
                None => {
                    let mut joined = row.clone();
                    joined.extend(empty.iter().cloned());
                    map.push_row(joined);
                }
            }
        }
        map
    }
}

fn suffixed(header: &str, other: &[String], suffix: &str) -> String {
    if other.iter().any(|candidate| candidate == header) {
        format!("{header}{suffix}")
    } else {
        header.to_string()
    }
}
