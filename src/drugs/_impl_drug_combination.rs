use crate::drugs::{index_combinations, Drug, DrugCombination};
use crate::error::{DrugSynergyError, Result};
use std::fmt::{Display, Error, Formatter};

/// The 31-polynomial string hash over UTF-16 code units (`h = 31 * h + c`) with 32-bit
/// wrapping arithmetic.
///
/// Combination hashes are sums of these values, so they stay stable across runs and
/// platforms.
pub fn string_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(i32::from(c)))
}

impl DrugCombination {
    /// Create a new combination of the given drugs. The combination must be non-empty
    /// and cannot contain the same drug twice.
    pub fn new(drugs: Vec<Drug>) -> Result<DrugCombination> {
        if drugs.is_empty() {
            return Err(DrugSynergyError::config("Empty drug combination."));
        }
        for (i, drug) in drugs.iter().enumerate() {
            if drugs[..i].iter().any(|it| it.name() == drug.name()) {
                return Err(DrugSynergyError::config(format!(
                    "Drug `{}` appears twice in one combination.",
                    drug.name()
                )));
            }
        }
        Ok(DrugCombination { drugs })
    }

    pub fn drugs(&self) -> &[Drug] {
        &self.drugs
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    /// Always `false`, combinations are non-empty.
    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    pub fn drug_names(&self) -> Vec<&str> {
        self.drugs.iter().map(|it| it.name()).collect()
    }

    /// Display name of the combination: drug names in brackets, joined with `-`
    /// (e.g. `[PI]-[PD]`).
    pub fn name(&self) -> String {
        self.drugs
            .iter()
            .map(|it| format!("[{}]", it.name()))
            .collect::<Vec<_>>()
            .join("-")
    }

    /// The identity of this combination: the (wrapping) sum of `string_hash` of every drug
    /// name and every drug target. Does not depend on the order of drugs.
    pub fn combination_hash(&self) -> i32 {
        let mut hash = 0i32;
        for drug in &self.drugs {
            hash = hash.wrapping_add(string_hash(drug.name()));
            for target in drug.targets() {
                hash = hash.wrapping_add(string_hash(target));
            }
        }
        hash
    }

    /// All subsets with exactly one drug less, keeping the drug order of this combination.
    ///
    /// Subsets are produced in lexicographic order of the kept positions, i.e. for
    /// `[A]-[B]-[C]` this gives `[A]-[B]`, `[A]-[C]` and `[B]-[C]`. A single-drug
    /// combination has no subsets.
    pub fn subsets(&self) -> Vec<DrugCombination> {
        if self.drugs.len() < 2 {
            return Vec::new();
        }
        index_combinations(self.drugs.len(), self.drugs.len() - 1)
            .into_iter()
            .map(|indices| DrugCombination {
                drugs: indices.into_iter().map(|i| self.drugs[i].clone()).collect(),
            })
            .collect()
    }

    /// Check whether the two combinations contain the same drugs, regardless of their order.
    pub fn same_drugs(&self, other: &DrugCombination) -> bool {
        self.drugs.len() == other.drugs.len()
            && self
                .drugs
                .iter()
                .all(|drug| other.drugs.iter().any(|it| it.name() == drug.name()))
    }
}

impl Display for DrugCombination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        write!(f, "{}", self.name())
    }
}
