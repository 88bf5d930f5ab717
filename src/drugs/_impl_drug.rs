use crate::drugs::Drug;
use std::fmt::{Display, Error, Formatter};

impl Drug {
    /// Create a new `Drug` with the given `name`, `effect` (`true` = activates) and `targets`.
    pub fn new(name: &str, effect: bool, targets: Vec<String>) -> Drug {
        Drug {
            name: name.to_string(),
            targets,
            effect,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// `true` if the drug activates its targets, `false` if it inhibits them.
    pub fn effect(&self) -> bool {
        self.effect
    }

    /// Remove the first occurrence of `target` from this drug.
    ///
    /// Returns `false` if the drug does not have such target.
    pub fn remove_target(&mut self, target: &str) -> bool {
        if let Some(index) = self.targets.iter().position(|it| it == target) {
            self.targets.remove(index);
            tracing::debug!(drug = %self.name, target, "Removed drug target.");
            true
        } else {
            false
        }
    }
}

impl Display for Drug {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let effect = if self.effect { "activates" } else { "inhibits" };
        write!(f, "{}\t{}", self.name, effect)?;
        for target in &self.targets {
            write!(f, "\t{}", target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::drugs::Drug;

    #[test]
    fn drug_targets() {
        let mut drug = Drug::new("PD", false, vec!["MAP2K1".to_string(), "MAP2K2".to_string()]);
        assert_eq!("PD\tinhibits\tMAP2K1\tMAP2K2", drug.to_string());
        assert!(drug.remove_target("MAP2K1"));
        assert!(!drug.remove_target("MAP2K1"));
        assert_eq!(&["MAP2K2".to_string()], drug.targets());
        assert!(!drug.effect());
    }
}
