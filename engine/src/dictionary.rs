use parking_lot::RwLock;
use std::collections::HashMap;

pub type TermId = u32;

#[derive(Debug, Default)]
struct Terms {
    ids: HashMap<String, TermId>,
    by_id: Vec<String>,
}

/// Interns terms to dense ids in first-seen order, starting at 0.
///
/// `intern` takes `&self` so ingestion threads can share one dictionary.
/// Misses are re-checked under the write lock, so two threads seeing a new
/// term at the same time still agree on its id.
#[derive(Debug, Default)]
pub struct TermDictionary {
    terms: RwLock<Terms>,
}

impl TermDictionary {
    pub fn new() -> Self { Self::default() }

    /// Returns the id for `term`, assigning the next one if it is new.
    ///
    /// # Panics
    ///
    /// If more than `u32::MAX + 1` distinct terms are interned.
    pub fn intern(&self, term: &str) -> TermId {
        if let Some(&id) = self.terms.read().ids.get(term) {
            return id;
        }
        let mut terms = self.terms.write();
        if let Some(&id) = terms.ids.get(term) {
            return id;
        }
        let id = next_id(terms.by_id.len());
        terms.ids.insert(term.to_string(), id);
        terms.by_id.push(term.to_string());
        id
    }

    /// Lookup without interning.
    pub fn get(&self, term: &str) -> Option<TermId> {
        self.terms.read().ids.get(term).copied()
    }

    pub fn term(&self, id: TermId) -> Option<String> {
        self.terms.read().by_id.get(id as usize).cloned()
    }

    pub fn size(&self) -> usize { self.terms.read().by_id.len() }

    pub fn is_empty(&self) -> bool { self.size() == 0 }
}

fn next_id(len: usize) -> TermId {
    match TermId::try_from(len) {
        Ok(id) => id,
        Err(_) => panic!("term dictionary is full: {len} terms do not fit in a u32 id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn interning_twice_returns_same_id() {
        let dict = TermDictionary::new();
        let first = dict.intern("rust");
        let second = dict.intern("rust");
        assert_eq!(first, second);
        assert_eq!(dict.size(), 1);
    }

    #[test]
    fn ids_follow_first_seen_order() {
        let dict = TermDictionary::new();
        assert_eq!(dict.intern("cat"), 0);
        assert_eq!(dict.intern("dog"), 1);
        assert_eq!(dict.intern("cat"), 0);
        assert_eq!(dict.intern("fish"), 2);
        assert_eq!(dict.size(), 3);
    }

    #[test]
    fn distinct_terms_get_distinct_ids() {
        let dict = TermDictionary::new();
        let words = ["a", "b", "c", "ab", "ba", "A"];
        let ids: Vec<TermId> = words.iter().map(|w| dict.intern(w)).collect();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                assert_ne!(ids[i], ids[j], "{} and {} collided", words[i], words[j]);
            }
        }
    }

    #[test]
    fn reverse_lookup_and_get() {
        let dict = TermDictionary::new();
        let id = dict.intern("compiler");
        assert_eq!(dict.term(id).as_deref(), Some("compiler"));
        assert_eq!(dict.get("compiler"), Some(id));
        assert_eq!(dict.get("linker"), None);
        assert_eq!(dict.term(42), None);
        // get must not grow the dictionary
        assert_eq!(dict.size(), 1);
    }

    #[test]
    fn concurrent_first_sight_assigns_one_id() {
        let dict = Arc::new(TermDictionary::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dict = Arc::clone(&dict);
                thread::spawn(move || {
                    (0..100).map(|i| dict.intern(&format!("term{i}"))).collect::<Vec<_>>()
                })
            })
            .collect();
        let results: Vec<Vec<TermId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for r in &results[1..] {
            assert_eq!(r, &results[0]);
        }
        assert_eq!(dict.size(), 100);
        let mut ids = results[0].clone();
        ids.sort_unstable();
        assert_eq!(ids, (0..100).collect::<Vec<TermId>>());
    }

    #[test]
    fn next_id_is_exact_up_to_u32_max() {
        assert_eq!(next_id(0), 0);
        assert_eq!(next_id(u32::MAX as usize), u32::MAX);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    #[should_panic(expected = "term dictionary is full")]
    fn next_id_refuses_to_truncate() {
        next_id(u32::MAX as usize + 1);
    }
}
