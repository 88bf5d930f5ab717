use crate::BinaryOp;
use crate::BinaryOp::*;
use std::fmt::{Display, Error, Formatter};

impl BinaryOp {
    /// Evaluate this operator on two Boolean values.
    pub fn eval(self, left: bool, right: bool) -> bool {
        match self {
            And => left && right,
            Or => left || right,
            Xor => left != right,
            Imp => !left || right,
            Iff => left == right,
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let symbol = match self {
            And => "&",
            Or => "|",
            Xor => "^",
            Imp => "=>",
            Iff => "<=>",
        };
        write!(f, "{}", symbol)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::BinaryOp::*;

    #[test]
    fn binary_op_truth_tables() {
        assert!(And.eval(true, true));
        assert!(!And.eval(true, false));
        assert!(Or.eval(false, true));
        assert!(!Or.eval(false, false));
        assert!(Xor.eval(true, false));
        assert!(!Xor.eval(true, true));
        assert!(Imp.eval(false, false));
        assert!(!Imp.eval(true, false));
        assert!(Iff.eval(false, false));
        assert!(!Iff.eval(false, true));
        assert_eq!("<=>", Iff.to_string());
    }
}
