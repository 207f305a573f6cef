//! Random-forest backend: bagged Gini decision trees over sparse TF-IDF rows.
//!
//! Trees use an array-based node layout (`feature: -2` marks a leaf,
//! children by index) and store the training class distribution at each
//! leaf; the ensemble probability is the mean of the per-tree leaf
//! distributions.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use jurimap_core::ForestParams;

use crate::tfidf::SparseVec;

const LEAF: i32 = -2;
const NO_CHILD: i32 = -1;

/// A node in a trained decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Feature index to split on (`-2` for leaves).
    pub feature: i32,
    /// Split threshold; values <= threshold go left.
    pub threshold: f64,
    pub left: i32,
    pub right: i32,
    /// Class distribution at a leaf (empty for internal nodes).
    pub distribution: Vec<f64>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.feature == LEAF
    }
}

/// A single Gini-trained decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    n_classes: usize,
}

/// Per-split training context shared down the recursion.
struct GrowContext<'a> {
    x: &'a [SparseVec],
    y: &'a [u32],
    n_classes: usize,
    n_features: usize,
    params: &'a ForestParams,
}

impl DecisionTree {
    /// Grow one tree on the given sample indices.
    fn grow(ctx: &GrowContext<'_>, indices: &[usize], rng: &mut StdRng) -> Self {
        let mut nodes = Vec::new();
        Self::grow_node(ctx, indices, 0, rng, &mut nodes);
        Self {
            nodes,
            n_classes: ctx.n_classes,
        }
    }

    /// Recursively grow a node, returning its index in `nodes`.
    fn grow_node(
        ctx: &GrowContext<'_>,
        indices: &[usize],
        depth: usize,
        rng: &mut StdRng,
        nodes: &mut Vec<TreeNode>,
    ) -> i32 {
        let counts = class_counts(ctx.y, indices, ctx.n_classes);
        let impurity = gini(&counts, indices.len());

        let depth_capped = ctx
            .params
            .max_depth
            .is_some_and(|cap| depth >= cap);
        let too_small = indices.len() < 2 * ctx.params.min_leaf.max(1);

        let split = if impurity > 0.0 && !depth_capped && !too_small {
            best_split(ctx, indices, rng)
        } else {
            None
        };

        let Some((feature, threshold)) = split else {
            let idx = nodes.len() as i32;
            nodes.push(leaf(counts, indices.len()));
            return idx;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| ctx.x[i].get(feature) <= threshold);

        let idx = nodes.len() as i32;
        nodes.push(TreeNode {
            feature: feature as i32,
            threshold,
            left: NO_CHILD,
            right: NO_CHILD,
            distribution: Vec::new(),
        });
        let left = Self::grow_node(ctx, &left_idx, depth + 1, rng, nodes);
        let right = Self::grow_node(ctx, &right_idx, depth + 1, rng, nodes);
        nodes[idx as usize].left = left;
        nodes[idx as usize].right = right;
        idx
    }

    /// Leaf class distribution for one sample.
    pub fn predict_proba(&self, doc: &SparseVec) -> &[f64] {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                return &node.distribution;
            }
            idx = if doc.get(node.feature as u32) <= node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
        }
    }

    /// Predicted class for one sample.
    pub fn predict(&self, doc: &SparseVec) -> u32 {
        argmax(self.predict_proba(doc)) as u32
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

/// Bagged ensemble of decision trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
    n_features: usize,
}

impl Forest {
    /// Train the ensemble: one bootstrap sample per tree, √n_features
    /// candidate features per split.
    pub fn fit(
        x: &[SparseVec],
        y: &[u32],
        n_classes: usize,
        n_features: usize,
        params: &ForestParams,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = x.len();
        let ctx = GrowContext {
            x,
            y,
            n_classes,
            n_features,
            params,
        };

        let trees: Vec<DecisionTree> = (0..params.n_trees)
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::grow(&ctx, &bootstrap, &mut rng)
            })
            .collect();

        info!(
            trees = trees.len(),
            classes = n_classes,
            "trained random forest"
        );
        Self {
            trees,
            n_classes,
            n_features,
        }
    }

    /// Mean of per-tree leaf distributions.
    pub fn predict_proba(&self, doc: &SparseVec) -> Vec<f64> {
        let mut probs = vec![0.0f64; self.n_classes];
        for tree in &self.trees {
            for (acc, &p) in probs.iter_mut().zip(tree.predict_proba(doc)) {
                *acc += p;
            }
        }
        let n = self.trees.len().max(1) as f64;
        for p in &mut probs {
            *p /= n;
        }
        probs
    }

    /// Predicted class (highest mean probability).
    pub fn predict(&self, doc: &SparseVec) -> u32 {
        argmax(&self.predict_proba(doc)) as u32
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

// ── Split search ──

/// Best (feature, threshold) among √n_features random candidates, by
/// weighted Gini. `None` when no candidate separates the samples.
fn best_split(
    ctx: &GrowContext<'_>,
    indices: &[usize],
    rng: &mut StdRng,
) -> Option<(u32, f64)> {
    let m = (ctx.n_features as f64).sqrt().ceil() as usize;
    let candidates = sample(rng, ctx.n_features, m.min(ctx.n_features));

    let mut best: Option<(u32, f64, f64)> = None;
    for feature in candidates {
        let feature = feature as u32;
        let mut values: Vec<(f64, u32)> = indices
            .iter()
            .map(|&i| (ctx.x[i].get(feature), ctx.y[i]))
            .collect();
        values.sort_by(|a, b| a.0.total_cmp(&b.0));

        // Sweep split positions with running left-side counts.
        let total = class_counts_from(values.iter().map(|&(_, c)| c), ctx.n_classes);
        let mut left = vec![0usize; ctx.n_classes];
        let n = values.len();
        for pos in 1..n {
            left[values[pos - 1].1 as usize] += 1;
            if values[pos].0 == values[pos - 1].0 {
                continue;
            }
            if pos < ctx.params.min_leaf || n - pos < ctx.params.min_leaf {
                continue;
            }
            let right: Vec<usize> = total
                .iter()
                .zip(&left)
                .map(|(&t, &l)| t - l)
                .collect();
            let weighted = (pos as f64 * gini(&left, pos)
                + (n - pos) as f64 * gini(&right, n - pos))
                / n as f64;
            if best.is_none_or(|(_, _, b)| weighted < b) {
                let threshold = (values[pos - 1].0 + values[pos].0) / 2.0;
                best = Some((feature, threshold, weighted));
            }
        }
    }

    best.map(|(f, t, _)| (f, t))
}

fn class_counts(y: &[u32], indices: &[usize], n_classes: usize) -> Vec<usize> {
    class_counts_from(indices.iter().map(|&i| y[i]), n_classes)
}

fn class_counts_from(classes: impl Iterator<Item = u32>, n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for c in classes {
        counts[c as usize] += 1;
    }
    counts
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

fn leaf(counts: Vec<usize>, n: usize) -> TreeNode {
    let n = n.max(1) as f64;
    TreeNode {
        feature: LEAF,
        threshold: 0.0,
        left: NO_CHILD,
        right: NO_CHILD,
        distribution: counts.into_iter().map(|c| c as f64 / n).collect(),
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0usize;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(entries: &[(u32, f64)]) -> SparseVec {
        SparseVec {
            entries: entries.to_vec(),
        }
    }

    fn params(n_trees: usize) -> ForestParams {
        ForestParams {
            n_trees,
            max_depth: None,
            min_leaf: 1,
        }
    }

    /// Class 0 lives on feature 0, class 1 on feature 1.
    fn separable_data() -> (Vec<SparseVec>, Vec<u32>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..10 {
            let w = 0.5 + (i as f64) * 0.05;
            x.push(doc(&[(0, w)]));
            y.push(0);
            x.push(doc(&[(1, w)]));
            y.push(1);
        }
        (x, y)
    }

    #[test]
    fn forest_separates_disjoint_classes() {
        let (x, y) = separable_data();
        let forest = Forest::fit(&x, &y, 2, 2, &params(25), 42);
        assert_eq!(forest.predict(&doc(&[(0, 0.7)])), 0);
        assert_eq!(forest.predict(&doc(&[(1, 0.7)])), 1);
    }

    #[test]
    fn proba_sums_to_one_and_favors_true_class() {
        let (x, y) = separable_data();
        let forest = Forest::fit(&x, &y, 2, 2, &params(25), 42);
        let probs = forest.predict_proba(&doc(&[(1, 0.8)]));
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(probs[1] > 0.5);
    }

    #[test]
    fn training_is_deterministic_for_a_seed() {
        let (x, y) = separable_data();
        let a = Forest::fit(&x, &y, 2, 2, &params(10), 7);
        let b = Forest::fit(&x, &y, 2, 2, &params(10), 7);
        let probe = doc(&[(0, 0.6)]);
        assert_eq!(a.predict_proba(&probe), b.predict_proba(&probe));
    }

    #[test]
    fn pure_node_becomes_leaf_without_split() {
        let x = vec![doc(&[(0, 1.0)]), doc(&[(0, 0.5)])];
        let y = vec![0, 0];
        let forest = Forest::fit(&x, &y, 1, 1, &params(1), 1);
        let probs = forest.predict_proba(&doc(&[(0, 0.2)]));
        assert_eq!(probs, vec![1.0]);
    }

    #[test]
    fn depth_cap_is_respected() {
        let (x, y) = separable_data();
        let capped = ForestParams {
            n_trees: 5,
            max_depth: Some(1),
            min_leaf: 1,
        };
        let forest = Forest::fit(&x, &y, 2, 2, &capped, 11);
        // A depth-1 tree has at most 3 nodes.
        assert!(forest.trees.iter().all(|t| t.n_nodes() <= 3));
    }

    #[test]
    fn leaf_distribution_reflects_class_mix() {
        // Inseparable data: all docs identical, 3:1 class mix.
        let x = vec![doc(&[(0, 1.0)]); 4];
        let y = vec![0, 0, 0, 1];
        let forest = Forest::fit(&x, &y, 2, 1, &params(1), 5);
        let probs = forest.predict_proba(&doc(&[(0, 1.0)]));
        // One tree, one leaf; bootstrap mix stays dominated by class 0
        // often but always sums to 1.
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
