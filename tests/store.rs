mod common;

use std::fs;

use assert_matches::assert_matches;

use lpsn_genus::config::RegistryConfig;
use lpsn_genus::domain::{Rank, TaxonName};
use lpsn_genus::error::LpsnError;
use lpsn_genus::store::{RegistrySource, RegistryStore};

use common::{MockFetcher, page, tax_tree};

fn config(temp: &tempfile::TempDir) -> RegistryConfig {
    let mut config = RegistryConfig::new(temp.path().join("out").join("LPSN-GenusList.csv"));
    config.cache_dir = temp.path().join("lpsnCache");
    config.base_url = "http://lpsn.test".to_string();
    config
}

#[test]
fn missing_file_is_built_and_saved() {
    let temp = tempfile::tempdir().unwrap();
    let config = config(&temp);
    let fetcher = MockFetcher::default().with_page(
        &config.listing_url('E'),
        &page(&[tax_tree(&[
            ("domain", "bacteria"),
            ("order", "enterobacterales-no-"),
            ("genus", "escherichia"),
        ])]),
    );

    let (registry, source) = RegistryStore::new(&config).load(&fetcher).unwrap();

    assert_eq!(source, RegistrySource::Built);
    assert_eq!(registry.len(), 1);
    assert_eq!(
        fs::read_to_string(&config.registry_path).unwrap(),
        "Domain,Order,Genus\nBacteria,Unclassified,Escherichia\n"
    );
}

#[test]
fn existing_file_is_loaded_without_fetching() {
    let temp = tempfile::tempdir().unwrap();
    let config = config(&temp);
    fs::create_dir_all(config.registry_path.parent().unwrap()).unwrap();
    fs::write(
        &config.registry_path,
        "Genus,Domain,Class\nEscherichia,Bacteria,Unclassified\nStale,,\n",
    )
    .unwrap();
    let fetcher = MockFetcher::default();

    let (registry, source) = RegistryStore::new(&config).load(&fetcher).unwrap();

    assert_eq!(source, RegistrySource::Loaded);
    assert!(fetcher.calls().is_empty());
    assert_eq!(registry.columns(), &[Rank::Genus, Rank::Domain, Rank::Class]);
    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.records()[0].get(Rank::Class),
        Some(&TaxonName::Unclassified)
    );
    assert_eq!(registry.records()[1].get(Rank::Domain), None);
}

#[test]
fn second_load_reuses_saved_registry() {
    let temp = tempfile::tempdir().unwrap();
    let config = config(&temp);
    let fetcher = MockFetcher::default().with_page(
        &config.listing_url('B'),
        &page(&[tax_tree(&[("domain", "bacteria"), ("genus", "bacillus")])]),
    );

    let (built, _) = RegistryStore::new(&config).load(&fetcher).unwrap();
    let calls = fetcher.calls().len();
    let (loaded, source) = RegistryStore::new(&config).load(&fetcher).unwrap();

    assert_eq!(source, RegistrySource::Loaded);
    assert_eq!(fetcher.calls().len(), calls);
    assert_eq!(built, loaded);
}

#[test]
fn duplicate_rank_columns_are_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let config = config(&temp);
    fs::create_dir_all(config.registry_path.parent().unwrap()).unwrap();
    fs::write(&config.registry_path, "Genus,genus\nA,B\n").unwrap();

    let err = RegistryStore::new(&config)
        .load(&MockFetcher::default())
        .unwrap_err();
    assert_matches!(err, LpsnError::InvalidRegistry { .. });
}

#[test]
fn scrape_without_any_page_is_not_saved() {
    let temp = tempfile::tempdir().unwrap();
    let config = config(&temp);
    let fetcher = MockFetcher::default();

    let (registry, source) = RegistryStore::new(&config).load(&fetcher).unwrap();
    assert_eq!(source, RegistrySource::Unsaved);
    assert!(registry.is_empty());
    assert!(!config.registry_path.exists());

    // the next run scrapes again instead of trusting an empty file
    let (_, source) = RegistryStore::new(&config).load(&fetcher).unwrap();
    assert_eq!(source, RegistrySource::Unsaved);
    assert_eq!(fetcher.calls().len(), 52);
}
