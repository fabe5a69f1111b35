//! Sentence relevance scoring with TextRank.
//!
//! Sentences are nodes; edge weights are the TextRank overlap similarity of
//! their content words. Scores are the stationary distribution of a
//! weighted PageRank over that graph.

use std::collections::HashSet;

use crate::error::Result;
use crate::text::content_words;

/// Computes one relevance score per sentence.
pub trait RelevanceScorer: Send + Sync {
    /// Score `sentences`; the result has the same length and order.
    fn score(&self, sentences: &[String]) -> Result<Vec<f64>>;
}

/// TextRank scorer over a dense sentence similarity graph.
#[derive(Debug, Clone)]
pub struct TextRankScorer {
    /// Damping factor (typically 0.85)
    pub damping: f64,
    /// Maximum number of power iterations
    pub max_iterations: usize,
    /// L1 convergence threshold
    pub threshold: f64,
}

impl Default for TextRankScorer {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            threshold: 1e-6,
        }
    }
}

impl TextRankScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Overlap similarity: shared words normalized by log sentence lengths.
    pub fn similarity(a: &[String], b: &[String]) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        let norm = (a.len() as f64).log10() + (b.len() as f64).log10();
        if norm <= 0.0 {
            return 0.0;
        }

        let set_a: HashSet<&String> = a.iter().collect();
        let common = b
            .iter()
            .collect::<HashSet<_>>()
            .intersection(&set_a)
            .count();
        common as f64 / norm
    }

    /// Weighted PageRank over a dense, symmetric weight matrix.
    ///
    /// Nodes without edges are dangling: their mass is spread uniformly.
    fn rank(&self, weights: &[Vec<f64>]) -> Vec<f64> {
        let n = weights.len();
        if n == 0 {
            return Vec::new();
        }

        let totals: Vec<f64> = weights.iter().map(|row| row.iter().sum()).collect();
        let teleport = (1.0 - self.damping) / n as f64;
        let mut scores = vec![1.0 / n as f64; n];
        let mut new_scores = vec![0.0; n];

        for _ in 0..self.max_iterations {
            let dangling_mass: f64 = scores
                .iter()
                .zip(&totals)
                .filter(|(_, total)| **total <= 0.0)
                .map(|(score, _)| score)
                .sum();
            new_scores.fill(teleport + self.damping * dangling_mass / n as f64);

            for (node, &node_score) in scores.iter().enumerate() {
                if totals[node] <= 0.0 {
                    continue;
                }
                for (neighbor, &weight) in weights[node].iter().enumerate() {
                    if weight > 0.0 {
                        new_scores[neighbor] += self.damping * node_score * weight / totals[node];
                    }
                }
            }

            let delta: f64 = scores
                .iter()
                .zip(&new_scores)
                .map(|(old, new)| (old - new).abs())
                .sum();
            std::mem::swap(&mut scores, &mut new_scores);
            if delta <= self.threshold {
                break;
            }
        }

        let sum: f64 = scores.iter().sum();
        if sum > 0.0 {
            for score in &mut scores {
                *score /= sum;
            }
        }
        scores
    }
}

impl RelevanceScorer for TextRankScorer {
    fn score(&self, sentences: &[String]) -> Result<Vec<f64>> {
        let tokens: Vec<Vec<String>> = sentences.iter().map(|s| content_words(s)).collect();
        let n = tokens.len();

        let mut weights = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let sim = Self::similarity(&tokens[i], &tokens[j]);
                weights[i][j] = sim;
                weights[j][i] = sim;
            }
        }

        Ok(self.rank(&weights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_similarity_counts_shared_words() {
        let a = strings(&["nutrition", "surgery", "patients"]);
        let b = strings(&["surgery", "patients", "outcomes"]);
        let expected = 2.0 / (3f64.log10() * 2.0);
        assert!((TextRankScorer::similarity(&a, &b) - expected).abs() < 1e-12);
        assert_eq!(TextRankScorer::similarity(&a, &[]), 0.0);
    }

    #[test]
    fn test_single_word_sentences_have_no_similarity() {
        let a = strings(&["trial"]);
        assert_eq!(TextRankScorer::similarity(&a, &a), 0.0);
    }

    #[test]
    fn test_scores_align_with_sentences_and_sum_to_one() {
        let sentences = strings(&[
            "Preoperative nutrition reduced complications after lung surgery.",
            "Lung surgery patients received preoperative nutrition.",
            "Complications after lung surgery were measured.",
            "The weather was pleasant.",
        ]);
        let scores = TextRankScorer::new().score(&sentences).unwrap();
        assert_eq!(scores.len(), 4);
        assert!((scores.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        // The central sentence outranks the unrelated one.
        assert!(scores[0] > scores[3]);
    }

    #[test]
    fn test_empty_and_single_sentence() {
        let scorer = TextRankScorer::new();
        assert!(scorer.score(&[]).unwrap().is_empty());
        let one = scorer.score(&strings(&["Only sentence."])).unwrap();
        assert_eq!(one.len(), 1);
        assert!((one[0] - 1.0).abs() < 1e-9);
    }
}
