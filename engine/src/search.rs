use crate::corpus::SourceDocument;
use crate::index::Index;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub score: f64,
}

/// Build a fresh index from documents in the order given.
pub fn build_index(documents: &[SourceDocument]) -> Index {
    Index::build(documents)
}

/// Run a single-term query.
///
/// `None` means the query was empty and the index was not consulted;
/// `Some(vec![])` means nothing matched.
pub fn search(index: &Index, query_text: &str) -> Option<Vec<SearchResult>> {
    if query_text.is_empty() {
        return None;
    }
    let term = query_text.to_lowercase();
    let results = index
        .query(&term)
        .into_iter()
        .map(|hit| SearchResult { url: hit.document.url.clone(), score: hit.score })
        .collect();
    Some(results)
}
