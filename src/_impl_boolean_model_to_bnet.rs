use crate::{BinaryOp, BooleanModel, FnUpdate, VariableId};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A regex which only matches valid `.bnet` names.
    static ref BNET_NAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
}

impl BooleanModel {
    /// Produce a `.bnet` string representation of this model.
    ///
    /// Returns an error if the model contains names which are not supported in `.bnet`,
    /// such as starting with numbers.
    ///
    /// However, you can override this behaviour using `rename_if_necessary`. If this flag is set,
    /// all invalid names will be prefixed with `_`. Variable order is always preserved, so
    /// attractor strings computed for the written model still match this model.
    pub fn to_bnet(&self, rename_if_necessary: bool) -> Result<String, String> {
        let mut names = self.variables.clone();
        for name in names.iter_mut() {
            if !BNET_NAME_REGEX.is_match(name) {
                if rename_if_necessary {
                    *name = format!("_{}", name);
                } else {
                    return Err(format!(
                        "Variable {} cannot be exported to bnet. Please rename it first.",
                        name
                    ));
                }
            }
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(format!("Renaming produced duplicate variable `{}`.", name));
            }
        }

        let mut model = "targets,factors\n".to_string();
        for v in self.variables() {
            let function = self.get_update_function(v);
            let line = format!(
                "{}, {}\n",
                names[v.to_index()],
                fn_update_to_bnet_string(v, function, &names)
            );
            model.push_str(line.as_str());
        }

        Ok(model)
    }
}

fn fn_update_to_bnet_string(var: VariableId, function: &FnUpdate, names: &[String]) -> String {
    match function {
        FnUpdate::Var(id) => names[id.to_index()].clone(),
        FnUpdate::Const(value) => {
            // .bnet does not have constants, but we can simulate a constant like this:
            let name = &names[var.to_index()];
            if *value {
                format!("({} | !{})", name, name)
            } else {
                format!("({} & !{})", name, name)
            }
        }
        FnUpdate::Not(inner) => {
            format!("!{}", fn_update_to_bnet_string(var, inner, names))
        }
        FnUpdate::Binary(op, left, right) => {
            let left = fn_update_to_bnet_string(var, left, names);
            let right = fn_update_to_bnet_string(var, right, names);
            match *op {
                BinaryOp::And => format!("({} & {})", left, right),
                BinaryOp::Or => format!("({} | {})", left, right),
                BinaryOp::Imp => format!("(!{} | {})", left, right),
                BinaryOp::Iff => format!("(({} & {}) | (!{} & !{}))", left, right, left, right),
                BinaryOp::Xor => format!("(({} & !{}) | (!{} & {}))", left, right, left, right),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::BooleanModel;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_model_to_bnet() {
        let mut model = BooleanModel::try_from_booleannet(
            "A *= B and not C\nB *= A or C\nC *= A ^ B\nD *= A => B",
        )
        .unwrap();
        model.fix_variable("C", true);
        let bnet = model.to_bnet(false).unwrap();
        assert_eq!(
            "targets,factors\nA, (B & !C)\nB, (A | C)\nC, (C | !C)\nD, (!A | B)\n",
            bnet
        );

        let model_after = BooleanModel::try_from_bnet(bnet.as_str()).unwrap();
        assert_eq!(model.variable_names(), model_after.variable_names());
        for v in model.variables() {
            let state_a = [true, false, true, false];
            let state_b = [false, true, true, true];
            for state in [state_a, state_b] {
                assert_eq!(
                    model.get_update_function(v).evaluate(&state),
                    model_after.get_update_function(v).evaluate(&state)
                );
            }
        }
    }

    #[test]
    fn test_model_to_bnet_invalid() {
        let model = BooleanModel::new("x", vec!["3A".to_string(), "B".to_string()]).unwrap();
        // Model with names starting with numbers cannot be exported.
        assert!(model.to_bnet(false).is_err());
        let bnet = model.to_bnet(true).unwrap();
        assert!(bnet.contains("_3A, _3A"));

        let model = BooleanModel::new("x", vec!["3A".to_string(), "_3A".to_string()]).unwrap();
        assert!(model.to_bnet(true).is_err());
    }
}
