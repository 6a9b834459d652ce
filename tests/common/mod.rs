#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use lpsn_genus::error::LpsnError;
use lpsn_genus::lpsn::PageFetcher;

/// Serves canned pages by URL and records every request.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PageFetcher for MockFetcher {
    fn get(&self, url: &str) -> Result<String, LpsnError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| LpsnError::LpsnStatus {
                status: 404,
                message: "not found".to_string(),
            })
    }
}

pub fn tax_tree(links: &[(&str, &str)]) -> String {
    let anchors: String = links
        .iter()
        .map(|(rank, name)| format!(r#"<a href="/{rank}/{name}/">{name}</a>"#))
        .collect();
    format!(r#"<div class="tax-tree">{anchors}</div>"#)
}

pub fn page(trees: &[String]) -> String {
    format!("<html><body>{}</body></html>", trees.concat())
}
