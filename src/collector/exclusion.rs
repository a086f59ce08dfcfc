// src/collector/exclusion.rs
// =============================================================================
// Known non-content assets (platform logos, banners) that must never show up
// as post media.
//
// Entries are stored after host rewriting, because the URLs they are
// compared against have already been rewritten.
// =============================================================================

use std::collections::HashSet;

use crate::transform::HostRewrite;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    urls: HashSet<String>,
}

impl ExclusionSet {
    // Accepts any list of strings: &[String], Vec<&str>, an array...
    pub fn new<I, S>(urls: I, hosts: &HostRewrite) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls = urls
            .into_iter()
            .map(|url| hosts.apply(url.as_ref().trim()))
            // An empty entry would match every link without a URL
            .filter(|url| !url.is_empty())
            .collect();
        Self { urls }
    }

    // Exact match; no prefix or host-only matching
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
