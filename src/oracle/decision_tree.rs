//! CART decision tree (Gini impurity) for classification.
//!
//! Nodes are stored in a flat vector with the root at index 0; split nodes
//! reference their children by index. Samples with `value <= threshold`
//! go left.

use crate::error::TreeDefect;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A node in the flattened tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: usize,
    },
}

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Candidate features drawn per split
    pub max_features: usize,
}

/// A trained decision tree classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
}

impl DecisionTree {
    /// Grow a tree on the rows selected by `indices` (repeats allowed, as
    /// produced by bootstrap sampling).
    pub(crate) fn fit(
        x: &[Vec<f64>],
        y: &[usize],
        indices: Vec<usize>,
        n_classes: usize,
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let n_features = x.first().map(Vec::len).unwrap_or(0);
        let mut builder = TreeBuilder {
            x,
            y,
            n_classes,
            n_features,
            params,
            rng,
            nodes: Vec::new(),
        };
        builder.grow(indices, 0);

        Self {
            nodes: builder.nodes,
            n_features,
        }
    }

    /// Classify a single sample by walking from the root to a leaf
    pub fn predict(&self, features: &[f64]) -> usize {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { class } => return *class,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    idx = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Verify the node array can be walked: children always point to later
    /// nodes (so every walk ends at a leaf), split features fit the input
    /// width, and leaves name a known class.
    pub fn check_structure(&self, n_features: usize, n_classes: usize) -> Result<(), TreeDefect> {
        if self.nodes.is_empty() {
            return Err(TreeDefect::Empty);
        }
        for (node, entry) in self.nodes.iter().enumerate() {
            match *entry {
                TreeNode::Split {
                    feature, left, right, ..
                } => {
                    if feature >= n_features {
                        return Err(TreeDefect::FeatureOutOfRange {
                            node,
                            feature,
                            n_features,
                        });
                    }
                    for child in [left, right] {
                        if child <= node || child >= self.nodes.len() {
                            return Err(TreeDefect::BadChild { node, child });
                        }
                    }
                }
                TreeNode::Leaf { class } => {
                    if class >= n_classes {
                        return Err(TreeDefect::ClassOutOfRange {
                            node,
                            class,
                            n_classes,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Longest root-to-leaf path
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        self.node_depth(0)
    }

    fn node_depth(&self, idx: usize) -> usize {
        match &self.nodes[idx] {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => {
                1 + self.node_depth(*left).max(self.node_depth(*right))
            }
        }
    }
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    n_classes: usize,
    n_features: usize,
    params: TreeParams,
    rng: &'a mut StdRng,
    nodes: Vec<TreeNode>,
}

/// Best split found for a node
struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl TreeBuilder<'_> {
    /// Append the subtree for `indices` and return its root index
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let counts = self.class_counts(&indices);
        let node_idx = self.nodes.len();
        self.nodes.push(TreeNode::Leaf {
            class: majority_class(&counts),
        });

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if pure || depth_reached || indices.len() < self.params.min_samples_split {
            return node_idx;
        }

        let Some(split) = self.best_split(&indices, gini(&counts, indices.len())) else {
            return node_idx;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&row| self.x[row][split.feature] <= split.threshold);

        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);
        self.nodes[node_idx] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_idx
    }

    /// Search `max_features` random candidate features; if none of them can
    /// separate the node, keep drawing from the remaining features.
    fn best_split(&mut self, indices: &[usize], parent_impurity: f64) -> Option<Split> {
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(&mut *self.rng);

        let mut best: Option<Split> = None;
        for (visited, &feature) in features.iter().enumerate() {
            if visited >= self.params.max_features && best.is_some() {
                break;
            }
            if let Some(candidate) = self.best_split_for_feature(indices, feature) {
                if candidate.impurity < parent_impurity
                    && best.as_ref().map_or(true, |b| candidate.impurity < b.impurity)
                {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    /// Sweep sorted values once, updating class counts incrementally
    fn best_split_for_feature(&self, indices: &[usize], feature: usize) -> Option<Split> {
        let mut sorted: Vec<(f64, usize)> = indices
            .iter()
            .map(|&row| (self.x[row][feature], self.y[row]))
            .collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = sorted.len();
        let mut left_counts = vec![0usize; self.n_classes];
        let mut right_counts = vec![0usize; self.n_classes];
        for &(_, label) in &sorted {
            right_counts[label] += 1;
        }

        let mut best: Option<Split> = None;
        for i in 0..n - 1 {
            let (value, label) = sorted[i];
            left_counts[label] += 1;
            right_counts[label] -= 1;

            let next = sorted[i + 1].0;
            if next <= value {
                continue;
            }

            let n_left = i + 1;
            let n_right = n - n_left;
            let impurity = (n_left as f64 * gini(&left_counts, n_left)
                + n_right as f64 * gini(&right_counts, n_right))
                / n as f64;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                let mut threshold = value + (next - value) / 2.0;
                // Midpoint can round up to `next` for adjacent floats
                if threshold >= next {
                    threshold = value;
                }
                best = Some(Split {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
        best
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &row in indices {
            counts[self.y[row]] += 1;
        }
        counts
    }
}

/// Gini impurity: 1 - Σ p_i²
fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Most frequent class; the lowest class index wins ties
pub(crate) fn majority_class(counts: &[usize]) -> usize {
    let mut best = 0;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = class;
        }
    }
    best
}
