//! Decision-tree evaluation for the frozen base ensembles.
//!
//! Trees arrive as flat parallel arrays exported by the training pipeline
//! (sklearn layout: `feature < 0` marks a leaf, children are indices into
//! the same arrays). Structural validation happens once at load; traversal
//! itself is then infallible.

use super::artifact::TreeParams;
use super::ModelError;

/// A single decision tree in exported flat-array form.
#[derive(Debug, Clone)]
pub(crate) struct DecisionTree {
    feature: Vec<i32>,
    threshold: Vec<f64>,
    left: Vec<u32>,
    right: Vec<u32>,
    value: Vec<f64>,
}

impl DecisionTree {
    /// Compile exported parameters into an evaluable tree.
    ///
    /// # Errors
    /// Rejects ragged arrays, out-of-range feature indices, and child
    /// indices that do not strictly increase (the export's topological
    /// layout; this is what guarantees traversal terminates).
    pub(crate) fn from_params(
        params: &TreeParams,
        n_features: usize,
        leaf_bounds: Option<(f64, f64)>,
    ) -> Result<Self, ModelError> {
        let n = params.feature.len();
        if n == 0 {
            return Err(ModelError::Artifact("empty tree".into()));
        }
        if params.threshold.len() != n
            || params.left.len() != n
            || params.right.len() != n
            || params.value.len() != n
        {
            return Err(ModelError::Artifact(format!(
                "ragged tree arrays (node count {n})"
            )));
        }

        for idx in 0..n {
            let feature = params.feature[idx];
            if feature < 0 {
                let value = params.value[idx];
                if !value.is_finite() {
                    return Err(ModelError::Artifact(format!(
                        "non-finite leaf value at node {idx}"
                    )));
                }
                if let Some((lo, hi)) = leaf_bounds {
                    if value < lo || value > hi {
                        return Err(ModelError::Artifact(format!(
                            "leaf value {value} at node {idx} outside [{lo}, {hi}]"
                        )));
                    }
                }
            } else {
                if feature as usize >= n_features {
                    return Err(ModelError::Artifact(format!(
                        "feature index {feature} at node {idx} exceeds {n_features} features"
                    )));
                }
                if !params.threshold[idx].is_finite() {
                    return Err(ModelError::Artifact(format!(
                        "non-finite threshold at node {idx}"
                    )));
                }
                let (left, right) = (params.left[idx] as usize, params.right[idx] as usize);
                if left <= idx || left >= n || right <= idx || right >= n {
                    return Err(ModelError::Artifact(format!(
                        "child index out of range at node {idx}"
                    )));
                }
            }
        }

        Ok(Self {
            feature: params.feature.clone(),
            threshold: params.threshold.clone(),
            left: params.left.clone(),
            right: params.right.clone(),
            value: params.value.clone(),
        })
    }

    /// Route a feature vector to its leaf value.
    pub(crate) fn predict(&self, x: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            let feature = self.feature[idx];
            if feature < 0 {
                return self.value[idx];
            }
            idx = if x[feature as usize] <= self.threshold[idx] {
                self.left[idx] as usize
            } else {
                self.right[idx] as usize
            };
        }
    }
}

/// Mean of per-tree leaf class-1 fractions (variance-reduction learner).
pub(crate) fn bagged_probability(trees: &[DecisionTree], x: &[f64]) -> f64 {
    let sum: f64 = trees.iter().map(|tree| tree.predict(x)).sum();
    sum / trees.len() as f64
}

/// Sigmoid over the summed leaf logits plus the base score
/// (bias-reduction learner; learning rate is folded into the leaves at
/// export time).
pub(crate) fn boosted_probability(trees: &[DecisionTree], base_score: f64, x: &[f64]) -> f64 {
    let logit: f64 = base_score + trees.iter().map(|tree| tree.predict(x)).sum::<f64>();
    sigmoid(logit)
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(threshold: f64, left_value: f64, right_value: f64) -> TreeParams {
        TreeParams {
            feature: vec![0, -1, -1],
            threshold: vec![threshold, 0.0, 0.0],
            left: vec![1, 0, 0],
            right: vec![2, 0, 0],
            value: vec![0.0, left_value, right_value],
        }
    }

    #[test]
    fn test_traversal_routes_by_threshold() {
        let tree = DecisionTree::from_params(&stump(0.5, 0.1, 0.9), 1, Some((0.0, 1.0)))
            .expect("valid stump");
        assert!((tree.predict(&[0.5]) - 0.1).abs() < f64::EPSILON);
        assert!((tree.predict(&[0.51]) - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_out_of_range_feature() {
        let mut params = stump(0.5, 0.1, 0.9);
        params.feature[0] = 3;
        assert!(DecisionTree::from_params(&params, 1, None).is_err());
    }

    #[test]
    fn test_rejects_backward_child_index() {
        let mut params = stump(0.5, 0.1, 0.9);
        params.left[0] = 0;
        assert!(DecisionTree::from_params(&params, 1, None).is_err());
    }

    #[test]
    fn test_rejects_leaf_outside_bounds() {
        let params = stump(0.5, -0.2, 0.9);
        assert!(DecisionTree::from_params(&params, 1, Some((0.0, 1.0))).is_err());
    }

    #[test]
    fn test_bagged_probability_is_mean() {
        let trees = vec![
            DecisionTree::from_params(&stump(0.0, 0.2, 0.2), 1, Some((0.0, 1.0))).expect("tree"),
            DecisionTree::from_params(&stump(0.0, 0.6, 0.6), 1, Some((0.0, 1.0))).expect("tree"),
        ];
        assert!((bagged_probability(&trees, &[1.0]) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_boosted_probability_centered_at_base() {
        let trees = vec![
            DecisionTree::from_params(&stump(0.0, -0.3, 0.3), 1, None).expect("tree"),
            DecisionTree::from_params(&stump(0.0, 0.3, -0.3), 1, None).expect("tree"),
        ];
        // Contributions cancel, so the probability is sigmoid(base_score).
        let p = boosted_probability(&trees, 0.0, &[1.0]);
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_bounds() {
        assert!(sigmoid(-50.0) > 0.0);
        assert!(sigmoid(50.0) < 1.0);
        assert!((sigmoid(0.0) - 0.5).abs() < f64::EPSILON);
    }
}
