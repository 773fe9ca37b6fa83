pub mod cache;
pub mod corpus;
pub mod dictionary;
pub mod error;
pub mod index;
pub mod ranker;
pub mod search;
pub mod tokenizer;

pub use cache::IndexCache;
pub use corpus::{Category, Corpus, SourceDocument};
pub use dictionary::{TermDictionary, TermId};
pub use error::{Result, SearchError};
pub use index::{Document, Index};
pub use ranker::ScoredDocument;
pub use search::{build_index, search, SearchResult};
