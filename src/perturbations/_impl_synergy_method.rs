use crate::error::DrugSynergyError;
use crate::perturbations::SynergyMethod;
use std::fmt::{Display, Error, Formatter};
use std::str::FromStr;

impl FromStr for SynergyMethod {
    type Err = DrugSynergyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "hsa" => Ok(SynergyMethod::Hsa),
            "bliss" => Ok(SynergyMethod::Bliss),
            other => Err(DrugSynergyError::config(format!(
                "Synergy method `{}` is neither `hsa` or `bliss`",
                other
            ))),
        }
    }
}

impl Display for SynergyMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            SynergyMethod::Hsa => write!(f, "hsa"),
            SynergyMethod::Bliss => write!(f, "bliss"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::perturbations::SynergyMethod;
    use std::str::FromStr;

    #[test]
    fn parse_synergy_method() {
        assert_eq!(SynergyMethod::Hsa, SynergyMethod::from_str("hsa").unwrap());
        assert_eq!(SynergyMethod::Bliss, " bliss".parse::<SynergyMethod>().unwrap());
        assert_eq!("bliss", SynergyMethod::Bliss.to_string());
        let error = SynergyMethod::from_str("HSA-2").unwrap_err();
        assert!(error.to_string().contains("`HSA-2`"));
    }
}
