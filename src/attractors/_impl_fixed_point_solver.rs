use crate::attractors::{AttractorSolver, FixedPointSolver};
use crate::error::{DrugSynergyError, Result};
use crate::{BinaryOp, BooleanModel, FnUpdate};
use biodivine_lib_bdd::{Bdd, BddVariable, BddVariableSet};
use std::path::Path;

impl FixedPointSolver {
    pub fn new() -> FixedPointSolver {
        FixedPointSolver { _dummy: () }
    }

    /// Compute a `Bdd` of all stable states of `model`, i.e. states `x` where
    /// `x_i <=> f_i(x)` holds for every variable.
    ///
    /// Bdd variables follow the order of model variables.
    pub fn stable_states(
        model: &BooleanModel,
    ) -> std::result::Result<(BddVariableSet, Bdd), String> {
        let num_vars = u16::try_from(model.num_vars()).map_err(|_| {
            format!(
                "Model `{}` has too many variables ({}) for symbolic search.",
                model.name(),
                model.num_vars()
            )
        })?;
        let ctx = BddVariableSet::new_anonymous(num_vars);
        let variables = ctx.variables();
        let mut stable = ctx.mk_true();
        for var in model.variables() {
            let function = mk_fn_update_true(&ctx, &variables, model.get_update_function(var));
            let is_stable = ctx.mk_var(variables[var.to_index()]).iff(&function);
            stable = stable.and(&is_stable);
            if stable.is_false() {
                break;
            }
        }
        Ok((ctx, stable))
    }
}

impl AttractorSolver for FixedPointSolver {
    fn attractors(&self, model: &BooleanModel, _scratch: &Path) -> Result<Vec<String>> {
        let (ctx, stable) = Self::stable_states(model).map_err(DrugSynergyError::Solver)?;
        let variables = ctx.variables();
        let mut result: Vec<String> = stable
            .sat_valuations()
            .map(|valuation| {
                variables
                    .iter()
                    .map(|v| if valuation[*v] { '1' } else { '0' })
                    .collect()
            })
            .collect();
        result.sort();
        tracing::trace!(
            model = model.name(),
            count = result.len(),
            "Computed stable states."
        );
        Ok(result)
    }
}

/// **(internal)** Create a `Bdd` that is `true` exactly when the given `FnUpdate` evaluates
/// to `true`.
fn mk_fn_update_true(ctx: &BddVariableSet, variables: &[BddVariable], function: &FnUpdate) -> Bdd {
    match function {
        FnUpdate::Const(value) => {
            if *value {
                ctx.mk_true()
            } else {
                ctx.mk_false()
            }
        }
        FnUpdate::Var(id) => ctx.mk_var(variables[id.to_index()]),
        FnUpdate::Not(inner) => mk_fn_update_true(ctx, variables, inner).not(),
        FnUpdate::Binary(op, left, right) => {
            let l = mk_fn_update_true(ctx, variables, left);
            let r = mk_fn_update_true(ctx, variables, right);
            match op {
                BinaryOp::And => l.and(&r),
                BinaryOp::Or => l.or(&r),
                BinaryOp::Xor => l.xor(&r),
                BinaryOp::Imp => l.imp(&r),
                BinaryOp::Iff => l.iff(&r),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::attractors::{AttractorSolver, FixedPointSolver};
    use crate::BooleanModel;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn fixed_points_of_small_model() {
        // A toggle switch with a reporter: two stable states.
        let model = BooleanModel::try_from_bnet("A, !B\nB, !A\nC, A").unwrap();
        let solver = FixedPointSolver::new();
        let attractors = solver.attractors(&model, Path::new(".")).unwrap();
        assert_eq!(vec!["010".to_string(), "101".to_string()], attractors);
        for attractor in &attractors {
            let state: Vec<bool> = attractor.chars().map(|c| c == '1').collect();
            assert_eq!(state, model.successor(&state));
        }
    }

    #[test]
    fn fixed_points_after_perturbation() {
        let mut model = BooleanModel::try_from_bnet("A, !B\nB, !A\nC, A").unwrap();
        model.fix_variable("B", true);
        let attractors = FixedPointSolver::new()
            .attractors(&model, Path::new("."))
            .unwrap();
        assert_eq!(vec!["010".to_string()], attractors);
    }

    #[test]
    fn no_fixed_points() {
        // A negative loop only has a cyclic attractor.
        let model = BooleanModel::try_from_bnet("A, !B\nB, A").unwrap();
        let attractors = FixedPointSolver::new()
            .attractors(&model, Path::new("."))
            .unwrap();
        assert!(attractors.is_empty());
    }

    #[test]
    fn inputs_produce_all_combinations() {
        let model = BooleanModel::try_from_bnet("A, B & C").unwrap();
        let attractors = FixedPointSolver::new()
            .attractors(&model, Path::new("."))
            .unwrap();
        assert_eq!(vec!["000", "001", "010", "111"], attractors);
    }
}
