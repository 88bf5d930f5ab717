use crate::drugs::{index_combinations, Drug, DrugCombination, DrugPanel};
use crate::error::{DrugSynergyError, Result};
use crate::{content_lines, BooleanModel};
use std::path::Path;

/// An example drug panel, written by `DrugPanel::write_template`.
const DRUG_PANEL_TEMPLATE: &str = "#Name\tEffect\tTarget
PI\tinhibits\tPIK3CA
PD\tinhibits\tMAP2K1\tMAP2K2
CT\tinhibits\tGSK3A\tGSK3B
BI\tinhibits\tMAPK14
PK\tinhibits\tCTNNB1
AK\tinhibits\tAKT\tAKT1\tAKT2\tAKT3
5Z\tinhibits\tMAP3K7
";

/// Loading and basic inspection of a `DrugPanel`.
impl DrugPanel {
    /// Create a panel from the given drugs. Drug names must be unique.
    pub fn new(drugs: Vec<Drug>) -> Result<DrugPanel> {
        for (i, drug) in drugs.iter().enumerate() {
            if drugs[..i].iter().any(|it| it.name() == drug.name()) {
                return Err(DrugSynergyError::config(format!(
                    "Drug `{}` is defined twice in the drug panel",
                    drug.name()
                )));
            }
        }
        Ok(DrugPanel { drugs })
    }

    /// Parse a drug panel from its tab separated representation: every line is
    /// `name<TAB>effect<TAB>target<TAB>target...`, where effect is `inhibits` or `activates`.
    ///
    /// Empty lines and lines starting with `#` are skipped.
    pub fn try_from_tab(content: &str) -> Result<DrugPanel> {
        let mut drugs = Vec::new();
        for line in content_lines(content) {
            let mut fields = line.split('\t').map(|it| it.trim());
            let name = fields.next().unwrap_or_default();
            let effect = match fields.next() {
                Some("inhibits") => false,
                Some("activates") => true,
                Some(other) => {
                    return Err(DrugSynergyError::config(format!(
                        "Drug effect: `{}` is neither `activates` or `inhibits`",
                        other
                    )));
                }
                None => {
                    return Err(DrugSynergyError::config(format!(
                        "Drug `{}` has no effect defined",
                        name
                    )));
                }
            };
            let targets: Vec<String> = fields
                .filter(|it| !it.is_empty())
                .map(|it| it.to_string())
                .collect();
            tracing::debug!(drug = name, effect, ?targets, "Added drug.");
            drugs.push(Drug::new(name, effect, targets));
        }
        DrugPanel::new(drugs)
    }

    /// Read a drug panel file, see `DrugPanel::try_from_tab`.
    pub fn try_from_file<P: AsRef<Path>>(path: P) -> Result<DrugPanel> {
        let path = path.as_ref();
        tracing::info!("Reading drug panel file: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        DrugPanel::try_from_tab(content.as_str())
    }

    /// Write an example drug panel file to the given path.
    pub fn write_template<P: AsRef<Path>>(path: P) -> Result<()> {
        std::fs::write(path, DRUG_PANEL_TEMPLATE)?;
        Ok(())
    }

    pub fn drugs(&self) -> &[Drug] {
        &self.drugs
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    pub fn drug_names(&self) -> Vec<&str> {
        self.drugs.iter().map(|it| it.name()).collect()
    }

    pub fn find_drug(&self, name: &str) -> Option<&Drug> {
        self.drugs.iter().find(|it| it.name() == name)
    }

    /// Mutable access to a drug, used to edit drug targets before the panel is used.
    pub fn find_drug_mut(&mut self, name: &str) -> Option<&mut Drug> {
        self.drugs.iter_mut().find(|it| it.name() == name)
    }

    /// Same as `find_drug`, but a missing drug is a configuration error.
    pub fn get_drug(&self, name: &str) -> Result<&Drug> {
        self.find_drug(name).ok_or_else(|| {
            DrugSynergyError::config(format!("Drug `{}` was not found in drug panel", name))
        })
    }

    /// True if *all* of the given drug names are in this panel.
    pub fn contains_all(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.find_drug(name).is_some())
    }

    /// Log a warning for every drug target which is not a variable of the given `model`.
    ///
    /// Returns the missing targets (in panel order).
    pub fn check_drug_targets(&self, model: &BooleanModel) -> Vec<String> {
        let mut missing = Vec::new();
        for drug in &self.drugs {
            for target in drug.targets() {
                if model.find_variable(target).is_none() {
                    tracing::warn!(
                        "Target `{}` of Drug `{}` is not in the network file/model",
                        target,
                        drug.name()
                    );
                    missing.push(target.clone());
                }
            }
        }
        missing
    }
}

/// Combinations of drugs in a `DrugPanel`.
impl DrugPanel {
    /// Enumerate all combinations of `1..=max_size` drugs from this panel.
    ///
    /// Combinations are ordered by size and then lexicographically by the panel order of their
    /// drugs (for drugs `A, B, C`: `A`, `B`, `C`, `A-B`, `A-C`, `B-C`, ...). Drugs inside
    /// a combination follow the panel order.
    pub fn enumerate(&self, max_size: usize) -> Vec<DrugCombination> {
        let mut result = Vec::new();
        for k in 1..=max_size {
            for indices in index_combinations(self.drugs.len(), k) {
                result.push(DrugCombination {
                    drugs: indices.into_iter().map(|i| self.drugs[i].clone()).collect(),
                });
            }
        }
        result
    }

    /// Parse a list of combinations: one combination per line, drug names are separated
    /// by tabs. Empty lines and `#` comments are skipped.
    ///
    /// Every drug must be part of this panel, and the combinations must pass
    /// `DrugPanel::validate_subset_consistency`.
    pub fn parse_combinations(&self, content: &str) -> Result<Vec<DrugCombination>> {
        let mut combinations = Vec::new();
        for line in content_lines(content) {
            let drugs = line
                .split('\t')
                .map(|it| it.trim())
                .filter(|it| !it.is_empty())
                .map(|name| self.get_drug(name).cloned())
                .collect::<Result<Vec<Drug>>>()?;
            combinations.push(DrugCombination::new(drugs)?);
        }
        Self::validate_subset_consistency(&combinations)?;
        Ok(combinations)
    }

    /// Read a perturbations file, see `DrugPanel::parse_combinations`.
    pub fn load_combinations<P: AsRef<Path>>(&self, path: P) -> Result<Vec<DrugCombination>> {
        let path = path.as_ref();
        tracing::info!("Reading perturbations file: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        self.parse_combinations(content.as_str())
    }

    /// Check that for every combination of `k >= 2` drugs, all its `(k-1)`-subsets appear
    /// earlier in the list. Drug order is not relevant when searching for a subset.
    ///
    /// The error names the combination and its first missing subset.
    pub fn validate_subset_consistency(combinations: &[DrugCombination]) -> Result<()> {
        for (index, combination) in combinations.iter().enumerate() {
            tracing::trace!(combination = %combination, "Checking subsets.");
            for subset in combination.subsets() {
                let found = combinations[..index]
                    .iter()
                    .any(|previous| previous.same_drugs(&subset));
                if !found {
                    return Err(DrugSynergyError::config(format!(
                        "The drug combination `{}` does not have the subset `{}` defined in the perturbations file",
                        combination, subset
                    )));
                }
            }
        }
        Ok(())
    }

    /// All `(k-1)`-subsets of a `k`-combination, see `DrugCombination::subsets`.
    pub fn combination_subsets(combination: &DrugCombination) -> Vec<DrugCombination> {
        combination.subsets()
    }

    /// Identity of a combination, see `DrugCombination::combination_hash`.
    pub fn combination_hash(combination: &DrugCombination) -> i32 {
        combination.combination_hash()
    }
}

#[cfg(test)]
mod tests {
    use crate::drugs::{DrugCombination, DrugPanel};
    use crate::error::DrugSynergyError;
    use crate::BooleanModel;
    use pretty_assertions::assert_eq;

    const PANEL: &str = "#Name\tEffect\tTarget\nA\tinhibits\tA1\nB\tinhibits\tB1\tB2\nC\tactivates\tC1\n";

    fn names(combinations: &[DrugCombination]) -> Vec<String> {
        combinations.iter().map(|it| it.name()).collect()
    }

    fn binomial(n: usize, k: usize) -> usize {
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    #[test]
    fn read_drug_panel() {
        let panel = DrugPanel::try_from_tab(PANEL).unwrap();
        assert_eq!(3, panel.len());
        assert_eq!(vec!["A", "B", "C"], panel.drug_names());
        let b = panel.get_drug("B").unwrap();
        assert_eq!(&["B1".to_string(), "B2".to_string()], b.targets());
        assert!(!b.effect());
        assert!(panel.get_drug("C").unwrap().effect());
        assert!(panel.contains_all(&["A", "C"]));
        assert!(!panel.contains_all(&["A", "D"]));

        let error = panel.get_drug("D").unwrap_err();
        assert!(error.to_string().contains("Drug `D` was not found"));
    }

    #[test]
    fn read_invalid_drug_panel() {
        let error = DrugPanel::try_from_tab("A\tblocks\tA1").unwrap_err();
        assert!(matches!(error, DrugSynergyError::Configuration(_)));
        assert!(error.to_string().contains("`blocks` is neither"));
        assert!(DrugPanel::try_from_tab("A").is_err());
        assert!(DrugPanel::try_from_tab("A\tinhibits\nA\tactivates").is_err());
    }

    #[test]
    fn template_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drugpanel.tab");
        DrugPanel::write_template(&path).unwrap();
        let panel = DrugPanel::try_from_file(&path).unwrap();
        assert_eq!(7, panel.len());
        assert_eq!(4, panel.get_drug("AK").unwrap().targets().len());
    }

    #[test]
    fn enumerate_combinations() {
        let panel = DrugPanel::try_from_tab(PANEL).unwrap();
        let combinations = panel.enumerate(2);
        assert_eq!(
            vec!["[A]", "[B]", "[C]", "[A]-[B]", "[A]-[C]", "[B]-[C]"],
            names(&combinations)
        );
        assert!(panel.enumerate(0).is_empty());
        assert_eq!(7, panel.enumerate(5).len());
        assert!(DrugPanel::validate_subset_consistency(&panel.enumerate(3)).is_ok());

        let large = DrugPanel::try_from_tab(super::DRUG_PANEL_TEMPLATE).unwrap();
        for max_size in 0..=4 {
            let expected: usize = (1..=max_size).map(|k| binomial(7, k)).sum();
            let combinations = large.enumerate(max_size);
            assert_eq!(expected, combinations.len());
            for (i, c) in combinations.iter().enumerate() {
                assert!(!c.is_empty());
                assert!(!combinations[..i].iter().any(|it| it.same_drugs(c)));
            }
        }
    }

    #[test]
    fn parse_consistent_combinations() {
        let panel = DrugPanel::try_from_tab(PANEL).unwrap();
        // `C` simply does not appear in the panel.
        let combinations = panel.parse_combinations("A\nB\n\n# pairs\nB\tA\n").unwrap();
        assert_eq!(vec!["[A]", "[B]", "[B]-[A]"], names(&combinations));

        let combinations = panel
            .parse_combinations("A\nB\nC\nA\tB\nA\tC\nC\tB\nA\tB\tC\n")
            .unwrap();
        assert_eq!(7, combinations.len());
    }

    #[test]
    fn parse_inconsistent_combinations() {
        let panel = DrugPanel::try_from_tab(PANEL).unwrap();
        let error = panel.parse_combinations("A\nC\nA\tB\tC\n").unwrap_err();
        assert_eq!(
            "Configuration error: The drug combination `[A]-[B]-[C]` does not have the subset `[A]-[B]` defined in the perturbations file",
            error.to_string()
        );

        // Subsets must be defined before the combination.
        let error = panel.parse_combinations("A\tB\nA\nB\n").unwrap_err();
        assert!(error.to_string().contains("subset `[A]`"));

        let error = panel.parse_combinations("A\nD\n").unwrap_err();
        assert!(error.to_string().contains("Drug `D` was not found"));
    }

    #[test]
    fn load_combinations_from_file() {
        let panel = DrugPanel::try_from_tab(PANEL).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perturbations");
        std::fs::write(&path, "A\nB\nA\tB\n").unwrap();
        let combinations = panel.load_combinations(&path).unwrap();
        assert_eq!(3, combinations.len());
        assert_eq!(
            DrugPanel::combination_hash(&combinations[2]),
            combinations[2].combination_hash()
        );
        assert_eq!(2, DrugPanel::combination_subsets(&combinations[2]).len());
    }

    #[test]
    fn check_targets_and_edit_drugs() {
        let mut panel = DrugPanel::try_from_tab(PANEL).unwrap();
        let model = BooleanModel::try_from_bnet("A1, !B1\nB1, A1\nC1, C1").unwrap();
        assert_eq!(vec!["B2".to_string()], panel.check_drug_targets(&model));
        assert!(panel.find_drug_mut("B").unwrap().remove_target("B2"));
        assert!(panel.check_drug_targets(&model).is_empty());
    }
}
