use crate::FnUpdate::*;
use crate::{BinaryOp, BooleanModel, FnUpdate, VariableId};
use std::collections::HashSet;

/// Constructor and destructor utility methods. These mainly avoid unnecessary boxing
/// and exhaustive pattern matching when not necessary.
impl FnUpdate {
    /// Create a `true` formula.
    pub fn mk_true() -> FnUpdate {
        Const(true)
    }

    /// Create a `false` formula.
    pub fn mk_false() -> FnUpdate {
        Const(false)
    }

    /// Create an `x` formula where `x` is a Boolean variable.
    pub fn mk_var(id: VariableId) -> FnUpdate {
        Var(id)
    }

    /// Create a `!phi` formula, where `phi` is an inner `FnUpdate`.
    pub fn mk_not(inner: FnUpdate) -> FnUpdate {
        Not(Box::new(inner))
    }

    /// Create a `phi 'op' psi` where `phi` and `psi` are arguments of `op` operator.
    pub fn mk_binary(op: BinaryOp, left: FnUpdate, right: FnUpdate) -> FnUpdate {
        Binary(op, Box::new(left), Box::new(right))
    }

    /// Negate this function.
    pub fn negation(self) -> FnUpdate {
        FnUpdate::mk_not(self)
    }

    /// Create a conjunction.
    pub fn and(self, other: FnUpdate) -> FnUpdate {
        FnUpdate::mk_binary(BinaryOp::And, self, other)
    }

    /// Create a disjunction.
    pub fn or(self, other: FnUpdate) -> FnUpdate {
        FnUpdate::mk_binary(BinaryOp::Or, self, other)
    }

    /// If `Const`, return the value, otherwise return `None`.
    pub fn as_const(&self) -> Option<bool> {
        match self {
            Const(value) => Some(*value),
            _ => None,
        }
    }

    /// If `Var`, return the id, otherwise return `None`.
    pub fn as_var(&self) -> Option<VariableId> {
        match self {
            Var(value) => Some(*value),
            _ => None,
        }
    }

    /// If `Not`, return the inner function, otherwise return `None`.
    pub fn as_not(&self) -> Option<&FnUpdate> {
        match self {
            Not(inner) => Some(inner),
            _ => None,
        }
    }

    /// If `Binary`, return the operator and left/right formulas, otherwise return `None`.
    pub fn as_binary(&self) -> Option<(&FnUpdate, BinaryOp, &FnUpdate)> {
        match self {
            Binary(op, l, r) => Some((l, *op, r)),
            _ => None,
        }
    }
}

/// Other utility methods.
impl FnUpdate {
    /// Return a sorted vector of all variables that are actually used as inputs in this function.
    pub fn collect_arguments(&self) -> Vec<VariableId> {
        fn r_arguments(function: &FnUpdate, args: &mut HashSet<VariableId>) {
            match function {
                Const(_) => (),
                Var(id) => {
                    args.insert(*id);
                }
                Not(inner) => r_arguments(inner, args),
                Binary(_, l, r) => {
                    r_arguments(l, args);
                    r_arguments(r, args);
                }
            };
        }
        let mut args = HashSet::new();
        r_arguments(self, &mut args);
        let mut result: Vec<VariableId> = args.into_iter().collect();
        result.sort();
        result
    }

    /// Evaluate this function in the given state. The state is indexed by `VariableId`.
    ///
    /// Panics if the function references a variable outside of `state`.
    pub fn evaluate(&self, state: &[bool]) -> bool {
        match self {
            Const(value) => *value,
            Var(id) => state[id.0],
            Not(inner) => !inner.evaluate(state),
            Binary(op, l, r) => op.eval(l.evaluate(state), r.evaluate(state)),
        }
    }

    /// Convert this update function to a string, using the variable names of the given
    /// `model`.
    pub fn to_string(&self, model: &BooleanModel) -> String {
        match self {
            Const(value) => value.to_string(),
            Var(id) => model.get_variable_name(*id).clone(),
            Not(inner) => format!("!{}", inner.to_string(model)),
            Binary(op, l, r) => {
                format!("({} {} {})", l.to_string(model), op, r.to_string(model))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{BooleanModel, FnUpdate, VariableId};

    #[test]
    fn basic_fn_update_properties() {
        let a = VariableId::from_index(0);
        let b = VariableId::from_index(1);
        let f = FnUpdate::mk_var(b).and(FnUpdate::mk_var(a).negation());
        assert_eq!(vec![a, b], f.collect_arguments());
        assert!(f.evaluate(&[false, true]));
        assert!(!f.evaluate(&[true, true]));
        assert_eq!(Some(true), FnUpdate::mk_true().as_const());
        assert_eq!(Some(a), FnUpdate::mk_var(a).as_var());
        assert!(FnUpdate::mk_false().collect_arguments().is_empty());

        let (left, _, right) = f.as_binary().unwrap();
        assert_eq!(Some(b), left.as_var());
        assert_eq!(Some(a), right.as_not().and_then(|it| it.as_var()));
    }

    #[test]
    fn fn_update_to_string() {
        let model = BooleanModel::try_from_bnet("targets, factors\nA, B & !C\nB, B\nC, A").unwrap();
        let a = model.find_variable("A").unwrap();
        let function = model.get_update_function(a);
        assert_eq!("(B & !C)", function.to_string(&model));
    }
}
