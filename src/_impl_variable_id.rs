use crate::VariableId;
use std::fmt::{Display, Error, Formatter};

impl VariableId {
    /// Create a `VariableId` from a raw index.
    ///
    /// The index is not checked against any model, so use with care.
    pub fn from_index(index: usize) -> VariableId {
        VariableId(index)
    }

    /// Obtain the raw index of this variable.
    pub fn to_index(self) -> usize {
        self.0
    }
}

impl From<usize> for VariableId {
    fn from(val: usize) -> Self {
        VariableId(val)
    }
}

impl From<VariableId> for usize {
    fn from(value: VariableId) -> Self {
        value.0
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "BnVariable({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::VariableId;

    #[test]
    fn variable_id_conversions() {
        let id = VariableId::from_index(3);
        assert_eq!(3, id.to_index());
        assert_eq!(id, VariableId::from(3));
        assert_eq!(3usize, usize::from(id));
        assert_eq!("BnVariable(3)", id.to_string());
    }
}
