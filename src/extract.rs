use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::domain::{GenusRecord, Rank, TaxonName, capitalize};

// Constant selectors; parsing them cannot fail.
static TAX_TREE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.tax-tree").expect("tax-tree selector"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("link selector"));
static RANK_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/*([^/]+)/([^/]+)/*$").expect("rank href pattern"));

/// One record per `div.tax-tree`, in document order.
///
/// Each link shaped like `/<rank>/<name>/` contributes `Rank -> Name`, both
/// capitalized. Trees without usable links still produce an empty record.
pub fn extract_genus_records(html: &str) -> Vec<GenusRecord> {
    let document = Html::parse_document(html);
    document
        .select(&TAX_TREE)
        .map(|tree| {
            let mut record = GenusRecord::new();
            for link in tree.select(&LINK) {
                let Some(href) = link.value().attr("href") else {
                    continue;
                };
                match parse_rank_href(href) {
                    Some((rank, name)) => record.insert(rank, name),
                    None => debug!(href, "skipping link outside rank/name pattern"),
                }
            }
            record
        })
        .collect()
}

pub fn parse_rank_href(href: &str) -> Option<(Rank, TaxonName)> {
    let captures = RANK_HREF.captures(href)?;
    let rank = captures[1].parse::<Rank>().ok()?;
    Some((rank, TaxonName::Named(capitalize(&captures[2]))))
}
