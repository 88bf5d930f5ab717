use crate::drugs::DrugCombination;
use crate::outputs::ModelOutputs;
use crate::perturbations::{Perturbation, ResponseStatistics};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

impl Perturbation {
    /// Create a perturbation of the given drug combination, without any predictions.
    pub fn new(combination: DrugCombination) -> Perturbation {
        for drug in combination.drugs() {
            if drug.targets().is_empty() {
                tracing::debug!(
                    "Added drug `{}` which has no targets to perturbations",
                    drug.name()
                );
            }
        }
        Perturbation {
            hash: combination.combination_hash(),
            combination,
            predicted_responses: Mutex::new(Vec::new()),
            synergies: AtomicUsize::new(0),
            non_synergies: AtomicUsize::new(0),
            statistics: Mutex::new(None),
        }
    }

    pub fn combination(&self) -> &DrugCombination {
        &self.combination
    }

    /// Number of drugs in this perturbation.
    pub fn size(&self) -> usize {
        self.combination.len()
    }

    pub fn name(&self) -> String {
        self.combination.name()
    }

    /// The combination hash of the drugs, see `DrugCombination::combination_hash`.
    pub fn hash(&self) -> i32 {
        self.hash
    }

    /// Record the raw global output predicted by one model.
    pub fn add_prediction(&self, response: f64) {
        lock(&self.predicted_responses).push(response);
        *lock(&self.statistics) = None;
    }

    /// A copy of all predicted responses, in the order they were added.
    pub fn predictions(&self) -> Vec<f64> {
        lock(&self.predicted_responses).clone()
    }

    pub fn add_synergy(&self) {
        self.synergies.fetch_add(1, Ordering::SeqCst);
    }

    pub fn add_non_synergy(&self) {
        self.non_synergies.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of models which predicted this combination to be synergistic.
    pub fn synergies(&self) -> usize {
        self.synergies.load(Ordering::SeqCst)
    }

    /// Number of models which predicted this combination to be non-synergistic.
    pub fn non_synergies(&self) -> usize {
        self.non_synergies.load(Ordering::SeqCst)
    }

    /// Compute (and cache) the mean and the sample standard deviation of all
    /// predicted responses.
    ///
    /// Without predictions, both values are zero. With a single prediction, the standard
    /// deviation is zero.
    pub fn calculate_statistics(&self) -> ResponseStatistics {
        let responses = lock(&self.predicted_responses);
        let n = responses.len();
        let mut statistics = ResponseStatistics::default();
        if n > 0 {
            statistics.mean = responses.iter().sum::<f64>() / n as f64;
            if n > 1 {
                let variance: f64 = responses
                    .iter()
                    .map(|it| (it - statistics.mean) * (it - statistics.mean))
                    .sum();
                statistics.sd = (variance / (n - 1) as f64).sqrt();
            }
        }
        *lock(&self.statistics) = Some(statistics);
        tracing::trace!(
            perturbation = %self.combination,
            mean = statistics.mean,
            sd = statistics.sd,
            "Statistics calculated."
        );
        statistics
    }

    /// Cached statistics, computed if necessary.
    pub fn statistics(&self) -> ResponseStatistics {
        let cached = *lock(&self.statistics);
        cached.unwrap_or_else(|| self.calculate_statistics())
    }

    /// Mean predicted response over the ensemble.
    pub fn mean(&self) -> f64 {
        self.statistics().mean
    }

    /// Standard deviation of the predicted responses.
    pub fn sd(&self) -> f64 {
        self.statistics().sd
    }

    /// Mean predicted response normalized into `[0, 1]` using the given outputs.
    pub fn normalized_mean(&self, outputs: &ModelOutputs) -> f64 {
        outputs.normalize(self.mean())
    }
}

/// **(internal)** Lock a mutex. A panic in another thread does not invalidate the data
/// (every update is a single push or assignment), so poisoning is ignored.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use crate::drugs::{Drug, DrugCombination};
    use crate::outputs::ModelOutputs;
    use crate::perturbations::Perturbation;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn perturbation() -> Perturbation {
        let a = Drug::new("A", false, vec!["A1".to_string(), "A2".to_string()]);
        let b = Drug::new("B", false, Vec::new());
        Perturbation::new(DrugCombination::new(vec![a, b]).unwrap())
    }

    #[test]
    fn double_perturbation() {
        let perturbation = perturbation();
        assert_eq!("[A]-[B]", perturbation.name());
        assert_eq!(4260, perturbation.hash());
        assert_eq!(2, perturbation.size());

        // No predictions.
        let statistics = perturbation.calculate_statistics();
        assert_eq!(0.0, statistics.mean);
        assert_eq!(0.0, statistics.sd);
        assert!(perturbation.predictions().is_empty());

        for (response, synergy) in [(0.0, true), (-0.1, true), (-1.1, true), (0.3, false), (1.5, false)] {
            perturbation.add_prediction(response);
            if synergy {
                perturbation.add_synergy();
            } else {
                perturbation.add_non_synergy();
            }
        }
        assert_eq!(3, perturbation.synergies());
        assert_eq!(2, perturbation.non_synergies());
        assert_eq!(vec![0.0, -0.1, -1.1, 0.3, 1.5], perturbation.predictions());
        assert!((perturbation.mean() - 0.12).abs() < 1e-9);
        assert!((perturbation.sd() - 0.93381).abs() < 1e-5);

        let outputs = ModelOutputs::try_from_tab("X\t1\nY\t1\nZ\t-1\nW\t-1").unwrap();
        assert!((perturbation.normalized_mean(&outputs) - 0.53).abs() < 1e-9);
    }

    #[test]
    fn statistics_follow_new_predictions() {
        let perturbation = perturbation();
        perturbation.add_prediction(1.0);
        assert_eq!(1.0, perturbation.mean());
        assert_eq!(0.0, perturbation.sd());
        perturbation.add_prediction(3.0);
        assert_eq!(2.0, perturbation.mean());
    }

    #[test]
    fn concurrent_updates() {
        let perturbation = Arc::new(perturbation());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let perturbation = perturbation.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        perturbation.add_prediction(f64::from(i));
                        perturbation.add_synergy();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(800, perturbation.predictions().len());
        assert_eq!(800, perturbation.synergies());
        assert!((perturbation.mean() - 3.5).abs() < 1e-9);
    }
}
