//! `>>N` citations between posts on the same board

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::PostId;

/// `>>` followed by a post number
pub(crate) static CITATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r">>([0-9]+)").expect("invalid citation regex"));

/// Extract cited post ids, deduplicated, in order of first appearance.
///
/// Numbers that are zero or overflow `u64` are ignored.
pub fn extract(content: &str) -> Vec<PostId> {
    let mut ids: Vec<PostId> = Vec::new();

    for caps in CITATION_RE.captures_iter(content) {
        let Some(id) = caps[1].parse::<u64>().ok().and_then(|n| PostId::new(n).ok()) else {
            continue;
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    ids
}

/// Reverse citation index: cited post -> posts that cite it
#[derive(Debug, Clone, Default)]
pub struct CitationIndex {
    cited_by: HashMap<PostId, Vec<PostId>>,
}

impl CitationIndex {
    /// Record that `post` cites each id in `cites`.
    pub fn record(&mut self, post: PostId, cites: &[PostId]) {
        for cited in cites {
            let citing = self.cited_by.entry(*cited).or_default();
            if !citing.contains(&post) {
                citing.push(post);
            }
        }
    }

    /// Posts citing `id`, in the order they were recorded.
    pub fn cited_by(&self, id: PostId) -> &[PostId] {
        self.cited_by.get(&id).map(Vec::as_slice).unwrap_or_default()
    }
}
