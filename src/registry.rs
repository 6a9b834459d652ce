use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::cache::PageCache;
use crate::config::RegistryConfig;
use crate::domain::{GenusRecord, Rank, TaxonName};
use crate::error::LpsnError;
use crate::extract::extract_genus_records;
use crate::lpsn::PageFetcher;
use crate::table::Table;

/// Genus lineages scraped from LPSN.
///
/// `columns` is the union of ranks across records, in order of first
/// appearance. No two records agree on every column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    columns: Vec<Rank>,
    records: Vec<GenusRecord>,
}

impl Registry {
    /// Builds the table view: column union, then exact-row deduplication.
    pub fn from_records(records: impl IntoIterator<Item = GenusRecord>) -> Self {
        let mut columns = Vec::new();
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let records: Vec<GenusRecord> = records.into_iter().collect();

        for record in &records {
            for rank in record.ranks() {
                if !columns.contains(&rank) {
                    columns.push(rank);
                }
            }
        }

        for record in records {
            let key: Vec<Option<TaxonName>> = columns
                .iter()
                .map(|rank| record.get(*rank).cloned())
                .collect();
            if seen.insert(key) {
                kept.push(record);
            }
        }

        Self {
            columns,
            records: kept,
        }
    }

    pub fn columns(&self) -> &[Rank] {
        &self.columns
    }

    pub fn records(&self) -> &[GenusRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records by exact genus name, in registry order.
    pub fn genus_index(&self) -> HashMap<&str, Vec<&GenusRecord>> {
        let mut index: HashMap<&str, Vec<&GenusRecord>> = HashMap::new();
        for record in &self.records {
            if let Some(genus) = record.genus() {
                index.entry(genus.as_str()).or_default().push(record);
            }
        }
        index
    }

    pub fn to_table(&self) -> Table {
        let headers = self.columns.iter().map(|rank| rank.to_string()).collect();
        let mut table = Table::new(headers);
        for record in &self.records {
            table.push_row(self.row_cells(record));
        }
        table
    }

    /// Cells of `record` laid out along this registry's columns.
    pub fn row_cells(&self, record: &GenusRecord) -> Vec<String> {
        self.columns
            .iter()
            .map(|rank| {
                record
                    .get(*rank)
                    .map(|name| name.as_str().to_string())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Reads a persisted registry as-is.
    ///
    /// Only rank columns are kept: a file edited to carry extra columns loses
    /// them here (with a warning), and they never reach the join map. Files
    /// written by [`Registry::to_table`] hold rank columns only.
    pub fn from_table(table: &Table, path: &Path) -> Result<Self, LpsnError> {
        let mut columns = Vec::new();
        let mut positions = Vec::new();
        for (position, header) in table.headers.iter().enumerate() {
            match header.parse::<Rank>() {
                Ok(rank) if columns.contains(&rank) => {
                    return Err(LpsnError::InvalidRegistry {
                        path: path.to_path_buf(),
                        message: format!("duplicate column {rank}"),
                    });
                }
                Ok(rank) => {
                    columns.push(rank);
                    positions.push((position, rank));
                }
                Err(_) => warn!(column = %header, path = %path.display(), "ignoring non-rank column"),
            }
        }

        let records = table
            .rows
            .iter()
            .map(|row| {
                positions
                    .iter()
                    .filter_map(|(position, rank)| {
                        let cell = row.get(*position).map(String::as_str).unwrap_or("");
                        TaxonName::from_cell(cell).map(|name| (*rank, name))
                    })
                    .collect()
            })
            .collect();

        Ok(Self { columns, records })
    }
}

/// Drives extraction across the A-Z listing pages.
pub struct RegistryBuilder<'a, F: PageFetcher> {
    config: &'a RegistryConfig,
    cache: PageCache<F>,
}

impl<'a, F: PageFetcher> RegistryBuilder<'a, F> {
    pub fn new(config: &'a RegistryConfig, fetcher: F) -> Self {
        Self {
            config,
            cache: PageCache::new(config.cache_dir.clone(), fetcher),
        }
    }

    pub fn build(&self) -> Result<Registry, LpsnError> {
        self.build_with_page_count().map(|(registry, _)| registry)
    }

    /// Also returns how many listing pages had content.
    pub fn build_with_page_count(&self) -> Result<(Registry, usize), LpsnError> {
        let mut records = Vec::new();
        let mut pages = 0;
        for letter in 'A'..='Z' {
            let url = self.config.listing_url(letter);
            match self.cache.fetch_or_read(&url)? {
                Some(html) => {
                    let page = extract_genus_records(&html);
                    debug!(%letter, records = page.len(), "parsed genus page");
                    records.extend(page);
                    pages += 1;
                }
                None => warn!(%letter, "no content for genus page"),
            }
        }

        let registry = Registry::from_records(records.into_iter().map(GenusRecord::normalized));
        info!(rows = registry.len(), pages, "built genus registry");
        Ok((registry, pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(Rank, &str)]) -> GenusRecord {
        pairs
            .iter()
            .map(|(rank, name)| (*rank, TaxonName::Named(name.to_string())))
            .collect()
    }

    #[test]
    fn columns_follow_first_appearance() {
        let registry = Registry::from_records(vec![
            record(&[(Rank::Genus, "Bacillus")]),
            record(&[(Rank::Domain, "Bacteria"), (Rank::Genus, "Escherichia")]),
        ]);
        assert_eq!(registry.columns(), &[Rank::Genus, Rank::Domain]);
        assert_eq!(registry.to_table().rows[0], vec!["Bacillus", ""]);
    }

    #[test]
    fn same_values_in_other_link_order_are_duplicates() {
        let registry = Registry::from_records(vec![
            record(&[(Rank::Domain, "Bacteria"), (Rank::Genus, "Bacillus")]),
            record(&[(Rank::Genus, "Bacillus"), (Rank::Domain, "Bacteria")]),
        ]);
        assert_eq!(registry.len(), 1);
    }
}
