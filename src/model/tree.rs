//! CART regression tree minimizing squared error.

use crate::profile::{FeatureVector, FEATURE_COUNT};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` considers all of them
    pub max_features: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree stored as a flat node arena, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// sum_left^2 / n_left + sum_right^2 / n_right; larger means lower SSE
    score: f64,
}

struct Builder<'a, R: Rng> {
    rows: &'a [FeatureVector],
    labels: &'a [f64],
    params: &'a TreeParams,
    rng: &'a mut R,
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grow a tree over `sample`, a list of row indices that may repeat
    /// (bootstrap draws).
    pub fn fit<R: Rng>(
        rows: &[FeatureVector],
        labels: &[f64],
        sample: &[usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut builder = Builder {
            rows,
            labels,
            params,
            rng,
            nodes: Vec::new(),
        };
        let mut indices = sample.to_vec();
        builder.grow(&mut indices, 0);
        Self {
            nodes: builder.nodes,
        }
    }

    pub fn predict(&self, features: &FeatureVector) -> f64 {
        let mut current = 0;
        loop {
            match &self.nodes[current] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    current = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Structural check used when loading a persisted tree: every child
    /// index points forward inside the arena and every feature exists.
    pub fn is_well_formed(&self) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().enumerate().all(|(i, node)| match node {
                Node::Leaf { value } => value.is_finite(),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    *feature < FEATURE_COUNT
                        && threshold.is_finite()
                        && *left > i
                        && *right > i
                        && *left < self.nodes.len()
                        && *right < self.nodes.len()
                }
            })
    }
}

impl<R: Rng> Builder<'_, R> {
    fn grow(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let slot = self.nodes.len();
        let mean = self.mean(indices);
        self.nodes.push(Node::Leaf { value: mean });

        if depth >= self.params.max_depth
            || indices.len() < 2 * self.params.min_samples_leaf
            || self.is_pure(indices)
        {
            return slot;
        }

        let Some(best) = self.best_split(indices) else {
            return slot;
        };

        let boundary = partition(indices, |&i| self.rows[i][best.feature] <= best.threshold);
        let (left_idx, right_idx) = indices.split_at_mut(boundary);
        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);

        self.nodes[slot] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        slot
    }

    fn mean(&self, indices: &[usize]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        indices.iter().map(|&i| self.labels[i]).sum::<f64>() / indices.len() as f64
    }

    fn is_pure(&self, indices: &[usize]) -> bool {
        let first = self.labels[indices[0]];
        indices
            .iter()
            .all(|&i| (self.labels[i] - first).abs() <= f64::EPSILON)
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        match self.params.max_features {
            Some(k) if k < FEATURE_COUNT => {
                rand::seq::index::sample(&mut *self.rng, FEATURE_COUNT, k.max(1)).into_vec()
            }
            _ => (0..FEATURE_COUNT).collect(),
        }
    }

    fn best_split(&mut self, indices: &[usize]) -> Option<SplitCandidate> {
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let total: f64 = indices.iter().map(|&i| self.labels[i]).sum();
        let parent_score = total * total / n as f64;

        let mut best: Option<SplitCandidate> = None;
        let mut sorted = indices.to_vec();

        for feature in self.candidate_features() {
            let rows = self.rows;
            sorted.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

            let mut left_sum = 0.0;
            for pos in 1..n {
                left_sum += self.labels[sorted[pos - 1]];

                if pos < min_leaf || n - pos < min_leaf {
                    continue;
                }
                let below = rows[sorted[pos - 1]][feature];
                let above = rows[sorted[pos]][feature];
                if below >= above {
                    continue;
                }

                let right_sum = total - left_sum;
                let score =
                    left_sum * left_sum / pos as f64 + right_sum * right_sum / (n - pos) as f64;

                if best.is_none_or(|b| score > b.score) {
                    let mut threshold = (below + above) / 2.0;
                    if threshold >= above {
                        threshold = below;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        score,
                    });
                }
            }
        }

        best.filter(|b| b.score > parent_score + parent_score.abs() * 1e-12)
    }
}

/// Reorder `items` so those matching `pred` come first; returns their count
fn partition<T, F: Fn(&T) -> bool>(items: &mut [T], pred: F) -> usize {
    let mut boundary = 0;
    for i in 0..items.len() {
        if pred(&items[i]) {
            items.swap(boundary, i);
            boundary += 1;
        }
    }
    boundary
}
