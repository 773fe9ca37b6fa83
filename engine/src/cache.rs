use crate::corpus::Corpus;
use crate::error::Result;
use crate::index::Index;
use parking_lot::Mutex;
use std::sync::Arc;

/// Keeps the most recently built index for as long as the corpus
/// fingerprint stays the same.
#[derive(Default)]
pub struct IndexCache {
    current: Mutex<Option<(String, Arc<Index>)>>,
}

impl IndexCache {
    pub fn new() -> Self { Self::default() }

    /// Return the cached index for `corpus`, rebuilding if its files changed.
    ///
    /// The lock is held across a rebuild so concurrent callers wait for one
    /// build instead of each starting their own.
    pub fn get_or_build(&self, corpus: &Corpus) -> Result<Arc<Index>> {
        let fingerprint = corpus.fingerprint()?;
        let mut current = self.current.lock();
        if let Some((cached, index)) = current.as_ref() {
            if *cached == fingerprint {
                tracing::debug!(%fingerprint, "index cache hit");
                return Ok(Arc::clone(index));
            }
        }
        let documents = corpus.load()?;
        let index = Arc::new(Index::build_parallel(&documents));
        tracing::info!(%fingerprint, num_docs = index.len(), num_terms = index.dictionary().size(), "index rebuilt");
        *current = Some((fingerprint, Arc::clone(&index)));
        Ok(index)
    }

    pub fn clear(&self) {
        *self.current.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Category;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reuses_index_until_corpus_changes() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("A"), "cat dog").unwrap();
        let corpus = Corpus::new(vec![Category { name: "c".into(), dir: dir.path().to_path_buf() }]);
        let cache = IndexCache::new();

        let first = cache.get_or_build(&corpus).unwrap();
        let second = cache.get_or_build(&corpus).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        fs::write(dir.path().join("B"), "dog").unwrap();
        let third = cache.get_or_build(&corpus).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.len(), 2);

        cache.clear();
        let fourth = cache.get_or_build(&corpus).unwrap();
        assert!(!Arc::ptr_eq(&third, &fourth));
    }

    #[test]
    fn searches_do_not_grow_cached_index() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("A"), "rust cargo").unwrap();
        let corpus = Corpus::new(vec![Category { name: "c".into(), dir: dir.path().to_path_buf() }]);
        let cache = IndexCache::new();

        let index = cache.get_or_build(&corpus).unwrap();
        let before = index.dictionary().size();
        for i in 0..10_000 {
            assert_eq!(crate::search(&index, &format!("junk{i}")), Some(vec![]));
        }
        let again = cache.get_or_build(&corpus).unwrap();
        assert!(Arc::ptr_eq(&index, &again));
        assert_eq!(again.dictionary().size(), before);
    }

    #[test]
    fn concurrent_callers_share_one_index() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("A"), "cat dog cat").unwrap();
        fs::write(dir.path().join("B"), "dog dog dog").unwrap();
        let corpus = Corpus::new(vec![Category { name: "c".into(), dir: dir.path().to_path_buf() }]);
        let cache = IndexCache::new();
        let expected = crate::search(&cache.get_or_build(&corpus).unwrap(), "dog");

        let indexes: Vec<Arc<Index>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|t| {
                    let (cache, corpus, expected) = (&cache, &corpus, &expected);
                    scope.spawn(move || {
                        let index = cache.get_or_build(corpus).unwrap();
                        for i in 0..200 {
                            assert_eq!(&crate::search(&index, "dog"), expected);
                            assert_eq!(crate::search(&index, &format!("unseen{t}-{i}")), Some(vec![]));
                        }
                        index
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let terms = indexes[0].dictionary().size();
        assert_eq!(terms, 2);
        for index in &indexes[1..] {
            assert!(Arc::ptr_eq(&indexes[0], index));
            assert_eq!(index.dictionary().size(), terms);
        }
    }

    #[test]
    fn failed_build_is_not_cached() {
        let dir = tempdir().unwrap();
        let corpus = Corpus::new(vec![Category { name: "c".into(), dir: dir.path().join("missing") }]);
        let cache = IndexCache::new();
        assert!(cache.get_or_build(&corpus).is_err());
        assert!(cache.current.lock().is_none());
    }
}
