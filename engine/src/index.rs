use crate::corpus::SourceDocument;
use crate::dictionary::{TermDictionary, TermId};
use crate::ranker::{rank, ScoredDocument};
use crate::tokenizer::tokenize;
use rayon::prelude::*;

/// An indexed document: its url and the term ids of its text, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub url: String,
    pub term_ids: Vec<TermId>,
}

/// In-memory index over a fixed set of documents.
///
/// Documents keep insertion order. The dictionary is shared by every
/// document and by queries.
#[derive(Debug, Default)]
pub struct Index {
    dictionary: TermDictionary,
    documents: Vec<Document>,
}

impl Index {
    pub fn new() -> Self { Self::default() }

    /// Build sequentially; term ids follow first-seen order across documents.
    pub fn build(sources: &[SourceDocument]) -> Self {
        let mut index = Index::new();
        for source in sources {
            index.add_document(&source.url, &source.text);
        }
        tracing::debug!(num_docs = index.len(), num_terms = index.dictionary.size(), "index built");
        index
    }

    /// Build with tokenizing and interning spread over the rayon pool.
    ///
    /// Document order matches `sources`. Term ids depend on scheduling, which
    /// does not change query results.
    pub fn build_parallel(sources: &[SourceDocument]) -> Self {
        let dictionary = TermDictionary::new();
        let documents: Vec<Document> = sources
            .par_iter()
            .map(|source| Document {
                url: source.url.clone(),
                term_ids: intern_all(&dictionary, &source.text),
            })
            .collect();
        tracing::debug!(num_docs = documents.len(), num_terms = dictionary.size(), "index built in parallel");
        Index { dictionary, documents }
    }

    pub fn add_document(&mut self, url: &str, text: &str) {
        let term_ids = intern_all(&self.dictionary, text);
        self.documents.push(Document { url: url.to_string(), term_ids });
    }

    /// Rank every document against a single term.
    ///
    /// Queries never add to the dictionary, so a shared index stays fixed
    /// after build. An unseen term matches nothing.
    pub fn query(&self, term: &str) -> Vec<ScoredDocument<'_>> {
        let Some(term_id) = self.dictionary.get(term) else {
            tracing::debug!(term, "query term not in dictionary");
            return Vec::new();
        };
        let hits = rank(&self.documents, term_id);
        tracing::debug!(term, term_id, hits = hits.len(), "query ranked");
        hits
    }

    pub fn dictionary(&self) -> &TermDictionary { &self.dictionary }

    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }
}

fn intern_all(dictionary: &TermDictionary, text: &str) -> Vec<TermId> {
    tokenize(text).iter().map(|t| dictionary.intern(t)).collect()
}
