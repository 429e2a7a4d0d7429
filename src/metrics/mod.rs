//! Evaluation helpers for trained jungles.

use ndarray::Array2;

use crate::dag::histogram::Histogram;
use crate::dataset::TrainingExample;
use crate::jungle::Jungle;

/// Fraction of examples the jungle misclassifies. An example with no
/// prediction counts as an error.
pub fn classification_error(jungle: &Jungle, examples: &[TrainingExample]) -> f64 {
    if examples.is_empty() {
        return 0.0;
    }
    let wrong = examples
        .iter()
        .filter(|ex| {
            jungle.predict(ex.features()).map(|p| p.label()) != Some(ex.label())
        })
        .count();
    wrong as f64 / examples.len() as f64
}

/// Confusion matrix with one row per actual class and one column per
/// predicted class. Examples without a prediction are not counted.
pub fn confusion_matrix(
    jungle: &Jungle,
    examples: &[TrainingExample],
    class_count: usize,
) -> Array2<u64> {
    let mut matrix = Array2::zeros((class_count, class_count));
    for ex in examples {
        if let Some(p) = jungle.predict(ex.features()) {
            if ex.label() < class_count && p.label() < class_count {
                matrix[[ex.label(), p.label()]] += 1;
            }
        }
    }
    matrix
}

/// Histogram of predicted labels over a set of unlabeled points.
pub fn prediction_histogram(
    jungle: &Jungle,
    points: &[Vec<f64>],
    class_count: usize,
) -> Histogram {
    let mut histogram = Histogram::new(class_count);
    for point in points {
        if let Some(p) = jungle.predict(point) {
            if p.label() < class_count {
                histogram.add_one(p.label());
            }
        }
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JungleConfig;
    use crate::jungle::JungleTrainer;

    fn examples() -> Vec<TrainingExample> {
        let mut set = Vec::new();
        for i in 0..10 {
            set.push(TrainingExample::new(vec![-5.0 - 0.1 * i as f64], 0));
            set.push(TrainingExample::new(vec![5.0 + 0.1 * i as f64], 1));
        }
        set
    }

    fn trained() -> Jungle {
        let config = JungleConfig::builder()
            .num_dags(3)
            .max_depth(4)
            .parallel(false)
            .use_bagging(false)
            .seed(5)
            .build()
            .unwrap();
        JungleTrainer::new(config).unwrap().train(&examples()).unwrap()
    }

    #[test]
    fn separable_data_trains_to_zero_error() {
        let jungle = trained();
        assert_eq!(classification_error(&jungle, &examples()), 0.0);
    }

    #[test]
    fn error_on_empty_set_is_zero() {
        let jungle = trained();
        assert_eq!(classification_error(&jungle, &[]), 0.0);
    }

    #[test]
    fn confusion_matrix_is_diagonal_for_perfect_model() {
        let jungle = trained();
        let matrix = confusion_matrix(&jungle, &examples(), 2);
        assert_eq!(matrix[[0, 0]], 10);
        assert_eq!(matrix[[1, 1]], 10);
        assert_eq!(matrix[[0, 1]], 0);
        assert_eq!(matrix[[1, 0]], 0);
    }

    #[test]
    fn prediction_histogram_counts_labels() {
        let jungle = trained();
        let points = vec![vec![-6.0], vec![-7.0], vec![6.0]];
        let histogram = prediction_histogram(&jungle, &points, 2);
        assert_eq!(histogram.get(0), 2);
        assert_eq!(histogram.get(1), 1);
        assert_eq!(histogram.mass(), 3);
    }
}
