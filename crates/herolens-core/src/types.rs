//! Core types for HeroLens

use serde::{Deserialize, Serialize};

/// The nine categories the bundled model was trained on, in output order
pub const DEFAULT_CLASSES: [&str; 9] = [
    "batman",
    "captain america",
    "deadpool",
    "hulk",
    "iron man",
    "spiderman",
    "superman",
    "wolverine",
    "wonder woman",
];

/// Owned copy of [`DEFAULT_CLASSES`]
pub fn default_classes() -> Vec<String> {
    DEFAULT_CLASSES.iter().map(|c| c.to_string()).collect()
}

/// Result of a single forward pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class label
    pub label: String,

    /// Index of `label` in the predictor's class list
    pub index: usize,

    /// One probability per class, in the predictor's class order
    pub probabilities: Vec<f32>,

    /// Wall-clock time of the forward pass in microseconds
    pub latency_us: u64,
}

impl Prediction {
    /// Build a prediction from per-class probabilities.
    ///
    /// The label is the class with the highest probability; the first index
    /// wins ties. Returns `None` when `classes` is empty or the lengths differ.
    pub fn from_probabilities(classes: &[String], probabilities: Vec<f32>) -> Option<Self> {
        if classes.is_empty() || classes.len() != probabilities.len() {
            return None;
        }

        let mut index = 0;
        for (i, p) in probabilities.iter().enumerate() {
            if *p > probabilities[index] {
                index = i;
            }
        }

        Some(Self {
            label: classes[index].clone(),
            index,
            probabilities,
            latency_us: 0,
        })
    }

    /// Probability of the predicted class
    pub fn confidence(&self) -> f32 {
        self.probabilities[self.index]
    }

    /// Pairs of (class, probability) in the given class order
    pub fn scores<'a>(&'a self, classes: &'a [String]) -> impl Iterator<Item = (&'a str, f32)> + 'a {
        classes
            .iter()
            .map(String::as_str)
            .zip(self.probabilities.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_keeps_first_on_tie() {
        let classes = default_classes();
        let prediction = Prediction::from_probabilities(&classes, vec![1.0 / 9.0; 9]).unwrap();
        assert_eq!(prediction.label, "batman");
        assert_eq!(prediction.index, 0);
    }

    #[test]
    fn test_argmax_picks_highest() {
        let classes = default_classes();
        let mut probs = vec![0.01; 9];
        probs[4] = 0.92;
        let prediction = Prediction::from_probabilities(&classes, probs).unwrap();
        assert_eq!(prediction.label, "iron man");
        assert!((prediction.confidence() - 0.92).abs() < f32::EPSILON);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let classes = default_classes();
        assert!(Prediction::from_probabilities(&classes, vec![0.5, 0.5]).is_none());
        assert!(Prediction::from_probabilities(&[], vec![]).is_none());
    }

    #[test]
    fn test_scores_preserve_order() {
        let classes = default_classes();
        let prediction = Prediction::from_probabilities(&classes, (0..9).map(|i| i as f32).collect()).unwrap();
        let names: Vec<&str> = prediction.scores(&classes).map(|(c, _)| c).collect();
        assert_eq!(names, DEFAULT_CLASSES.to_vec());
    }
}
