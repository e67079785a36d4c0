//! Bag-of-words interest vectors and cosine ranking.

use std::{cmp::Ordering, collections::HashMap};

#[derive(Debug, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Builds the vocabulary in first-seen order.
    pub fn build<'a, I, T>(interest_lists: I) -> Self
    where
        I: IntoIterator<Item = &'a [T]>,
        T: AsRef<str> + 'a,
    {
        let mut vocab = Self::default();
        for interests in interest_lists {
            for token in interests {
                let token = token.as_ref().to_lowercase();
                if !vocab.index.contains_key(&token) {
                    vocab.index.insert(token.clone(), vocab.terms.len());
                    vocab.terms.push(token);
                }
            }
        }
        vocab
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// `None` gives the zero vector.
    pub fn vectorize<T: AsRef<str>>(&self, interests: Option<&[T]>) -> Vec<f64> {
        let mut vector = vec![0.0; self.terms.len()];
        for token in interests.unwrap_or_default() {
            if let Some(&i) = self.index.get(&token.as_ref().to_lowercase()) {
                vector[i] += 1.0;
            }
        }
        vector
    }
}

/// `dot(a, b) / (|a| * |b|)`, or 0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<K> {
    pub key: K,
    pub similarity: f64,
}

/// Best `limit` candidates other than `target`, highest first. Ties keep input
/// order. `None` when `target` is not among the candidates.
pub fn rank_by_interest<'a, K, T>(
    target: &K,
    candidates: &[(K, Option<&'a [T]>)],
    limit: usize,
) -> Option<Vec<Ranked<K>>>
where
    K: PartialEq + Clone,
    T: AsRef<str> + 'a,
{
    let target_interests = candidates.iter().find(|(k, _)| k == target)?.1;

    let vocab = Vocabulary::build(candidates.iter().filter_map(|(_, interests)| *interests));
    let target_vector = vocab.vectorize(target_interests);

    let mut ranked: Vec<Ranked<K>> = candidates
        .iter()
        .filter(|(k, _)| k != target)
        .map(|(k, interests)| Ranked {
            key: k.clone(),
            similarity: cosine_similarity(&target_vector, &vocab.vectorize(*interests)),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(limit);
    Some(ranked)
}
