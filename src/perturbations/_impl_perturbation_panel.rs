use crate::drugs::{DrugCombination, DrugPanel};
use crate::error::{DrugSynergyError, Result};
use crate::outputs::ModelOutputs;
use crate::perturbations::{Perturbation, PerturbationPanel, SynergyMethod};

impl PerturbationPanel {
    /// Create a panel with one perturbation per combination, keeping their order.
    ///
    /// Fails if a combination comes before one of its subsets
    /// (see `DrugPanel::validate_subset_consistency`), or if two combinations have the same
    /// combination hash.
    pub fn new(combinations: Vec<DrugCombination>) -> Result<PerturbationPanel> {
        DrugPanel::validate_subset_consistency(&combinations)?;
        let panel = PerturbationPanel {
            perturbations: combinations.into_iter().map(Perturbation::new).collect(),
        };
        panel.check_hashes()?;
        tracing::debug!(
            perturbations = ?panel.combination_names(1),
            "Created perturbation panel."
        );
        Ok(panel)
    }

    /// **(internal)** Check that all perturbation hashes are pairwise distinct.
    fn check_hashes(&self) -> Result<()> {
        for (i, first) in self.perturbations.iter().enumerate() {
            for second in &self.perturbations[(i + 1)..] {
                if first.hash() == second.hash() {
                    return Err(DrugSynergyError::config(format!(
                        "Perturbations `{}` and `{}` have the same hash: {}",
                        first.name(),
                        second.name(),
                        first.hash()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn perturbations(&self) -> &[Perturbation] {
        &self.perturbations
    }

    /// Perturbations with exactly `size` drugs.
    pub fn perturbations_of_size(&self, size: usize) -> Vec<&Perturbation> {
        self.perturbations
            .iter()
            .filter(|it| it.size() == size)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.perturbations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perturbations.is_empty()
    }

    /// Number of perturbations with exactly `size` drugs.
    pub fn len_of_size(&self, size: usize) -> usize {
        self.perturbations
            .iter()
            .filter(|it| it.size() == size)
            .count()
    }

    /// Names of all perturbations with at least `min_size` drugs, in panel order.
    pub fn combination_names(&self, min_size: usize) -> Vec<String> {
        self.perturbations
            .iter()
            .filter(|it| it.size() >= min_size)
            .map(|it| it.name())
            .collect()
    }

    /// Find the index of the perturbation with the same combination hash as `combination`.
    pub fn lookup(&self, combination: &DrugCombination) -> Option<usize> {
        let hash = combination.combination_hash();
        self.perturbations.iter().position(|it| it.hash() == hash)
    }

    /// The ensemble-wide synergy score of a perturbation, computed from the mean responses
    /// of the perturbation and of its subsets:
    ///
    ///  - HSA: the difference between the mean response and the closest subset mean, if the
    ///  mean response is outside of the range of subset means, zero otherwise.
    ///  - Bliss: the normalized mean response minus the product of normalized subset means.
    ///
    /// Negative values indicate synergy. Fails when a subset is not part of this panel.
    pub fn response_excess(
        &self,
        perturbation: &Perturbation,
        method: SynergyMethod,
        outputs: &ModelOutputs,
    ) -> Result<f64> {
        let subsets = perturbation
            .combination()
            .subsets()
            .into_iter()
            .map(|subset| {
                let index = self.lookup(&subset).ok_or_else(|| {
                    DrugSynergyError::config(format!(
                        "The subset `{}` of `{}` is not in the perturbation panel",
                        subset,
                        perturbation.name()
                    ))
                })?;
                Ok(&self.perturbations[index])
            })
            .collect::<Result<Vec<&Perturbation>>>()?;
        if subsets.is_empty() {
            return Err(DrugSynergyError::config(format!(
                "Perturbation `{}` has no subsets",
                perturbation.name()
            )));
        }

        let excess = match method {
            SynergyMethod::Hsa => {
                let means: Vec<f64> = subsets.iter().map(|it| it.mean()).collect();
                let min = means.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = means.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                tracing::trace!(min, max, "Subset responses.");
                let response = perturbation.mean();
                if response < min {
                    response - min
                } else if response > max {
                    response - max
                } else {
                    0.0
                }
            }
            SynergyMethod::Bliss => {
                let expected: f64 = subsets.iter().map(|it| it.normalized_mean(outputs)).product();
                perturbation.normalized_mean(outputs) - expected
            }
        };
        Ok(excess)
    }
}

#[cfg(test)]
mod tests {
    use crate::drugs::{Drug, DrugCombination};
    use crate::error::DrugSynergyError;
    use crate::outputs::ModelOutputs;
    use crate::perturbations::{Perturbation, PerturbationPanel, SynergyMethod};
    use pretty_assertions::assert_eq;

    fn drugs() -> (Drug, Drug, Drug) {
        let a = Drug::new("A", false, vec!["AA1".to_string(), "AA2".to_string()]);
        let b = Drug::new("B", false, vec!["BB1".to_string(), "BB2".to_string()]);
        let c = Drug::new("C", true, vec!["CC1".to_string()]);
        (a, b, c)
    }

    fn combination(drugs: &[&Drug]) -> DrugCombination {
        DrugCombination::new(drugs.iter().map(|it| (*it).clone()).collect()).unwrap()
    }

    fn assert_close(expected: f64, actual: f64) {
        assert!(
            (expected - actual).abs() < 1e-9,
            "Expected {}, got {}.",
            expected,
            actual
        );
    }

    #[test]
    fn panel_with_three_perturbations() {
        let (a, b, c) = drugs();
        let panel = PerturbationPanel::new(vec![
            combination(&[&a]),
            combination(&[&b]),
            combination(&[&a, &b]),
        ])
        .unwrap();

        assert_eq!(3, panel.len());
        assert_eq!(0, panel.len_of_size(0));
        assert_eq!(2, panel.len_of_size(1));
        assert_eq!(1, panel.len_of_size(2));
        assert_eq!(0, panel.len_of_size(34));
        assert_eq!(1, panel.perturbations_of_size(2).len());
        assert!(panel.perturbations_of_size(0).is_empty());
        assert_eq!(vec!["[A]", "[B]", "[A]-[B]"], panel.combination_names(1));
        assert_eq!(vec!["[A]-[B]"], panel.combination_names(2));
        assert_eq!(Some(0), panel.lookup(&combination(&[&a])));
        assert_eq!(Some(2), panel.lookup(&combination(&[&b, &a])));
        assert_eq!(None, panel.lookup(&combination(&[&b, &c])));

        // Normalization with min output -2 and max output 2.
        let outputs = ModelOutputs::try_from_tab("X\t1\nY\t1\nZ\t-1\nW\t-1").unwrap();
        let ab = &panel.perturbations()[2];
        panel.perturbations()[0].add_prediction(0.7);
        panel.perturbations()[1].add_prediction(0.8);

        let expected = [
            (1.0, 0.2, 0.2775),
            (0.5, 0.0, 0.215),
            (0.65, 0.0, 0.2066666666666),
            (0.2, -0.1125, 0.174375),
            (-5.0, -1.23, -0.105),
        ];
        for (response, hsa, bliss) in expected {
            ab.add_prediction(response);
            let excess = panel
                .response_excess(ab, SynergyMethod::Hsa, &outputs)
                .unwrap();
            assert_close(hsa, excess);
            let excess = panel
                .response_excess(ab, SynergyMethod::Bliss, &outputs)
                .unwrap();
            assert!((bliss - excess).abs() < 1e-6);
        }
    }

    #[test]
    fn response_excess_of_single_drug_or_missing_subset() {
        let (a, b, c) = drugs();
        let panel = PerturbationPanel::new(vec![
            combination(&[&a]),
            combination(&[&b]),
            combination(&[&a, &b]),
        ])
        .unwrap();
        let outputs = ModelOutputs::try_from_tab("X\t1").unwrap();
        let outside = Perturbation::new(combination(&[&a, &c]));
        let error = panel
            .response_excess(&outside, SynergyMethod::Hsa, &outputs)
            .unwrap_err();
        assert!(error.to_string().contains("subset `[C]`"));
        assert!(panel
            .response_excess(&panel.perturbations()[0], SynergyMethod::Hsa, &outputs)
            .is_err());
    }

    #[test]
    fn combination_before_subset_is_rejected() {
        let (a, b, _) = drugs();
        let error = PerturbationPanel::new(vec![combination(&[&a, &b]), combination(&[&a])])
            .unwrap_err();
        assert!(matches!(error, DrugSynergyError::Configuration(_)));
        assert!(error
            .to_string()
            .contains("The drug combination `[A]-[B]` does not have the subset `[A]`"));

        let error = PerturbationPanel::new(vec![combination(&[&a]), combination(&[&a, &b])])
            .unwrap_err();
        assert!(error.to_string().contains("subset `[B]`"));
    }

    #[test]
    fn check_perturbation_hashes() {
        let (a, b, _) = drugs();
        let error = PerturbationPanel::new(vec![combination(&[&a]), combination(&[&a])])
            .unwrap_err();
        assert!(matches!(error, DrugSynergyError::Configuration(_)));
        assert_eq!(
            "Configuration error: Perturbations `[A]` and `[A]` have the same hash: 129124",
            error.to_string()
        );

        // Drug order does not change the identity of a combination.
        let error = PerturbationPanel::new(vec![
            combination(&[&a]),
            combination(&[&b]),
            combination(&[&a, &b]),
            combination(&[&b, &a]),
        ])
        .unwrap_err();
        assert!(error
            .to_string()
            .contains("Perturbations `[A]-[B]` and `[B]-[A]` have the same hash"));
    }
}
