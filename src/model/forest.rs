//! Bootstrap-aggregated regression trees.
//!
//! Every tree gets its own ChaCha stream seeded from a master generator,
//! so fitting in parallel produces the same forest as fitting serially.

use super::tree::{RegressionTree, TreeParams};
use super::FatiguePredictor;
use crate::errors::{FatigueError, Result};
use crate::profile::{FeatureVector, FEATURE_COUNT};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed ensemble hyperparameters (not searched)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` considers all of them
    pub max_features: Option<usize>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 300,
            max_depth: 12,
            min_samples_leaf: 3,
            max_features: None,
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(FatigueError::configuration("n_estimators must be at least 1"));
        }
        if self.max_depth == 0 {
            return Err(FatigueError::configuration("max_depth must be at least 1"));
        }
        if self.min_samples_leaf == 0 {
            return Err(FatigueError::configuration(
                "min_samples_leaf must be at least 1",
            ));
        }
        if let Some(k) = self.max_features {
            if k == 0 || k > FEATURE_COUNT {
                return Err(FatigueError::configuration(format!(
                    "max_features must lie in [1, {}], got {}",
                    FEATURE_COUNT, k
                )));
            }
        }
        Ok(())
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
        }
    }
}

/// Mean of independently bootstrapped regression trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit the ensemble. `on_tree_fitted` runs once per finished tree,
    /// possibly from a worker thread.
    pub fn fit<F>(
        rows: &[FeatureVector],
        labels: &[f64],
        params: &ForestParams,
        seed: u64,
        on_tree_fitted: F,
    ) -> Result<Self>
    where
        F: Fn() + Sync,
    {
        params.validate()?;
        if rows.is_empty() {
            return Err(FatigueError::EmptyDataset { dropped: 0 });
        }
        if rows.len() != labels.len() {
            return Err(FatigueError::configuration(format!(
                "row count {} does not match label count {}",
                rows.len(),
                labels.len()
            )));
        }

        let mut master = ChaCha8Rng::seed_from_u64(seed);
        let tree_seeds: Vec<u64> = (0..params.n_estimators).map(|_| master.gen()).collect();
        let tree_params = params.tree_params();
        let n = rows.len();

        let trees: Vec<RegressionTree> = tree_seeds
            .into_par_iter()
            .map(|tree_seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(tree_seed);
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let tree = RegressionTree::fit(rows, labels, &sample, &tree_params, &mut rng);
                on_tree_fitted();
                tree
            })
            .collect();

        tracing::debug!(
            trees = trees.len(),
            mean_leaves = trees.iter().map(RegressionTree::leaf_count).sum::<usize>() as f64
                / trees.len() as f64,
            "Forest fitted"
        );

        Ok(Self {
            params: *params,
            trees,
        })
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn is_well_formed(&self) -> bool {
        !self.trees.is_empty() && self.trees.iter().all(RegressionTree::is_well_formed)
    }
}

impl FatiguePredictor for RandomForest {
    fn name(&self) -> &str {
        "random-forest"
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(FatigueError::Prediction("forest has no trees".to_string()));
        }
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<f64>> {
        rows.par_iter().map(|row| self.predict(row)).collect()
    }
}
