//! Portable tree-ensemble classifier stored as JSON.
//!
//! Each tree uses scikit-learn's parallel-array layout: node `i` is a leaf
//! when `children_left[i] == -1`; otherwise samples with
//! `x[feature[i]] <= threshold[i]` go left. `value[i]` holds the per-class
//! weights of the node.

use crate::feature_extractor::{FeatureRecord, FEATURE_COUNT, FEATURE_NAMES};
use crate::models::classifier::Classifier;
use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

const LEAF: i64 = -1;

/// A single fitted decision tree
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<[f64; 2]>,
}

impl DecisionTree {
    fn validate(&self, index: usize) -> Result<()> {
        let nodes = self.children_left.len();
        ensure!(nodes > 0, "tree {} has no nodes", index);
        ensure!(
            self.children_right.len() == nodes
                && self.feature.len() == nodes
                && self.threshold.len() == nodes
                && self.value.len() == nodes,
            "tree {} has mismatched array lengths",
            index
        );

        for node in 0..nodes {
            let left = self.children_left[node];
            let right = self.children_right[node];
            if left == LEAF {
                ensure!(
                    right == LEAF,
                    "tree {} node {} has only one child",
                    index,
                    node
                );
                let weights = self.value[node];
                ensure!(
                    weights.iter().all(|w| w.is_finite() && *w >= 0.0)
                        && weights.iter().sum::<f64>() > 0.0,
                    "tree {} leaf {} has invalid class weights",
                    index,
                    node
                );
                continue;
            }

            // Children always come after their parent, so traversal terminates
            for child in [left, right] {
                ensure!(
                    child > node as i64 && (child as usize) < nodes,
                    "tree {} node {} points at invalid child {}",
                    index,
                    node,
                    child
                );
            }
            let feature = self.feature[node];
            ensure!(
                (0..FEATURE_COUNT as i64).contains(&feature),
                "tree {} node {} splits on unknown feature {}",
                index,
                node,
                feature
            );
            ensure!(
                self.threshold[node].is_finite(),
                "tree {} node {} has a non-finite threshold",
                index,
                node
            );
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf reached by `values`
    fn leaf_distribution(&self, values: &[f32; FEATURE_COUNT]) -> [f64; 2] {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let x = values[self.feature[node] as usize] as f64;
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let [w0, w1] = self.value[node];
        let total = w0 + w1;
        [w0 / total, w1 / total]
    }
}

/// Random-forest style ensemble: probabilities are the mean of the trees'
/// leaf distributions, the label is the most probable class.
#[derive(Debug, Clone, Deserialize)]
pub struct ForestClassifier {
    #[serde(skip)]
    name: String,
    pub feature_names: Vec<String>,
    pub trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    /// Load and validate a JSON ensemble from disk.
    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "Loading JSON tree ensemble");

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut forest = Self::from_json(&content)?;
        forest.name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "forest".to_string());

        info!(
            model = %forest.name,
            trees = forest.trees.len(),
            "Model loaded successfully"
        );
        Ok(forest)
    }

    /// Parse and validate an ensemble from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        let mut forest: ForestClassifier =
            serde_json::from_str(content).context("Invalid tree ensemble JSON")?;
        forest.name = "forest".to_string();
        forest.validate()?;
        Ok(forest)
    }

    fn validate(&self) -> Result<()> {
        if self.feature_names != FEATURE_NAMES {
            bail!(
                "Feature columns {:?} do not match expected {:?}",
                self.feature_names,
                FEATURE_NAMES
            );
        }
        ensure!(!self.trees.is_empty(), "Ensemble contains no trees");
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(index)?;
        }
        Ok(())
    }

    fn class_probabilities(&self, record: &FeatureRecord) -> [f64; 2] {
        let mut sum = [0.0, 0.0];
        for tree in &self.trees {
            let [p0, p1] = tree.leaf_distribution(record.values());
            sum[0] += p0;
            sum[1] += p1;
        }
        let n = self.trees.len() as f64;
        [sum[0] / n, sum[1] / n]
    }
}

impl Classifier for ForestClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, record: &FeatureRecord) -> Result<bool> {
        let [p0, p1] = self.class_probabilities(record);
        // Ties go to the negative class, like an argmax over [p0, p1]
        Ok(p1 > p0)
    }

    fn supports_probability(&self) -> bool {
        true
    }

    fn predict_proba(&self, record: &FeatureRecord) -> Result<[f64; 2]> {
        Ok(self.class_probabilities(record))
    }

    fn predict_with_proba(&self, record: &FeatureRecord) -> Result<(bool, [f64; 2])> {
        let probs = self.class_probabilities(record);
        Ok((probs[1] > probs[0], probs))
    }
}
