use crate::index::Document;
use crate::TermId;
use rayon::prelude::*;

/// Lower bound for the normalization divisor so an all-zero column divides
/// cleanly and stays all zeros.
pub const SCORE_FLOOR: f64 = 0.00001;

/// A document paired with its normalized score for one query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredDocument<'a> {
    pub document: &'a Document,
    /// Position of the document in the index (insertion order).
    pub position: usize,
    pub score: f64,
}

/// Raw score: number of occurrences of `term` in the document.
pub fn frequency_score(document: &Document, term: TermId) -> u32 {
    document.term_ids.iter().filter(|&&t| t == term).count() as u32
}

/// Scale scores in place so the largest becomes 1.0.
pub fn normalize(scores: &mut [f64]) {
    let max = scores.iter().copied().fold(0.0_f64, f64::max).max(SCORE_FLOOR);
    for s in scores.iter_mut() {
        *s /= max;
    }
}

/// Score every document against `term` and return the matches, best first.
///
/// Equal scores keep index order.
pub fn rank(documents: &[Document], term: TermId) -> Vec<ScoredDocument<'_>> {
    let mut scores: Vec<f64> = documents
        .par_iter()
        .map(|d| frequency_score(d, term) as f64)
        .collect();
    normalize(&mut scores);

    let mut hits: Vec<ScoredDocument<'_>> = documents
        .iter()
        .zip(scores)
        .enumerate()
        .filter(|(_, (_, score))| *score > 0.0)
        .map(|(position, (document, score))| ScoredDocument { document, position, score })
        .collect();
    hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.position.cmp(&b.position)));
    hits
}
