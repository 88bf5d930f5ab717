//! Drugs, drug combinations and the drug panel.
//!
//! A `DrugPanel` is the catalog of all drugs used in one analysis. It can enumerate every
//! combination up to a given size, or load an explicit list of combinations from
//! a perturbations file. In both cases, every combination of `k >= 2` drugs is required to
//! have all its `(k-1)`-subsets defined before it, since the synergy of a combination is
//! always judged against its subsets.

/// **(internal)** Basic methods of `Drug`.
mod _impl_drug;
/// **(internal)** Name, hash and subsets of `DrugCombination`.
mod _impl_drug_combination;
/// **(internal)** Loading, enumeration and validation of `DrugPanel`.
mod _impl_drug_panel;

pub use _impl_drug_combination::string_hash;

/// A single drug: a name, an ordered list of targeted nodes and the effect the drug has
/// on them (`true` = activates, `false` = inhibits).
///
/// A perturbed model has the update function of every target replaced by the
/// constant `effect`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Drug {
    name: String,
    targets: Vec<String>,
    effect: bool,
}

/// A non-empty set of distinct drugs that are applied together.
///
/// The order of drugs is kept for display purposes (`[A]-[B]`), but the identity of
/// a combination (`DrugCombination::combination_hash`) does not depend on it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DrugCombination {
    drugs: Vec<Drug>,
}

/// The catalog of drugs available to one analysis, in the order of the drug panel file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DrugPanel {
    drugs: Vec<Drug>,
}

/// **(internal)** All `k`-element subsets of `0..n` as sorted index vectors, in lexicographic
/// order (for `n = 3, k = 2`: `[0, 1]`, `[0, 2]`, `[1, 2]`).
pub(crate) fn index_combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    if k == 0 || k > n {
        return result;
    }
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        result.push(current.clone());
        // Find the rightmost index that can still be incremented.
        let mut i = k;
        while i > 0 && current[i - 1] == n - k + (i - 1) {
            i -= 1;
        }
        if i == 0 {
            return result;
        }
        current[i - 1] += 1;
        for j in i..k {
            current[j] = current[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::index_combinations;
    use pretty_assertions::assert_eq;

    #[test]
    fn index_combinations_lexicographic() {
        assert_eq!(
            vec![vec![0, 1], vec![0, 2], vec![1, 2]],
            index_combinations(3, 2)
        );
        assert_eq!(vec![vec![0, 1, 2]], index_combinations(3, 3));
        assert_eq!(10, index_combinations(5, 2).len());
        assert_eq!(10, index_combinations(5, 3).len());
        assert!(index_combinations(3, 0).is_empty());
        assert!(index_combinations(3, 4).is_empty());
    }
}
