mod common;

use std::fs;

use lpsn_genus::cache::{PageCache, url_hash};

use common::MockFetcher;

const URL: &str = "https://lpsn.dsmz.de/genus?page=A";

#[test]
fn second_read_hits_disk_only() {
    let temp = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::default().with_page(URL, "<html>A</html>");
    let cache = PageCache::new(temp.path().join("lpsnCache"), &fetcher);

    let first = cache.fetch_or_read(URL).unwrap();
    let second = cache.fetch_or_read(URL).unwrap();

    assert_eq!(first.as_deref(), Some("<html>A</html>"));
    assert_eq!(first, second);
    assert_eq!(fetcher.calls(), vec![URL.to_string()]);
}

#[test]
fn entry_is_named_by_url_md5() {
    let temp = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::default().with_page(URL, "body");
    let cache = PageCache::new(temp.path(), &fetcher);
    cache.fetch_or_read(URL).unwrap();

    let path = temp.path().join(format!("{}.html", url_hash(URL)));
    assert_eq!(cache.entry_path(URL), path);
    assert_eq!(fs::read_to_string(path).unwrap(), "body");
}

#[test]
fn existing_entry_is_never_refetched() {
    let temp = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::default().with_page(URL, "fresh");
    let cache = PageCache::new(temp.path(), &fetcher);
    fs::write(cache.entry_path(URL), "stale").unwrap();

    assert_eq!(cache.fetch_or_read(URL).unwrap().as_deref(), Some("stale"));
    assert!(fetcher.calls().is_empty());
}

#[test]
fn failed_fetch_yields_none_and_writes_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::default();
    let cache = PageCache::new(temp.path().join("cache"), &fetcher);

    assert_eq!(cache.fetch_or_read(URL).unwrap(), None);
    assert!(!cache.entry_path(URL).exists());

    // no negative caching: the next call asks again
    assert_eq!(cache.fetch_or_read(URL).unwrap(), None);
    assert_eq!(fetcher.calls().len(), 2);
}
