use crate::_expression_parser::ExpressionTemp;
use crate::BooleanModel;
use std::convert::TryFrom;

impl BooleanModel {
    /// Try to load a Boolean model from a BooleanNet model string.
    ///
    /// BooleanNet format uses keyword-based operators (`and`, `or`, `not`) and capitalized
    /// literals (`True`, `False`). Update rules are specified as `VAR *= expression`,
    /// `VAR* = expression` or `rank: VAR* = expression`.
    ///
    /// The same parser also reads `.gitsbe` model files, where every rule is prefixed with
    /// `equation:` and the model name is given as `modelname: name`. Other `key: value`
    /// metadata lines (fitness, stable states, mapping) are ignored.
    ///
    /// **Important notes:**
    /// - Initialization statements (e.g., `A = True`) are ignored as they relate to simulation,
    ///   not network structure.
    /// - Rank labels are ignored as they relate to simulation order.
    /// - Variables which are referenced but have no rule keep their value (identity function).
    pub fn try_from_booleannet(model_string: &str) -> Result<BooleanModel, String> {
        let mut name = String::new();
        let mut rules: Vec<(String, ExpressionTemp)> = Vec::new();

        for (line_num, line) in model_string.lines().enumerate() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(model_name) = line.strip_prefix("modelname:") {
                name = model_name.trim().to_string();
                continue;
            }

            if let Some((var_name, expression)) = parse_update_rule(line)? {
                if expression.contains("Random") {
                    return Err(format!(
                        "Line {}: 'Random' literal is not supported.",
                        line_num + 1
                    ));
                }
                if rules.iter().any(|(it, _)| *it == var_name) {
                    return Err(format!(
                        "Line {}: Duplicate update rule for variable '{}'.",
                        line_num + 1,
                        var_name
                    ));
                }
                let function = ExpressionTemp::try_from(expression.as_str())
                    .map_err(|e| format!("Line {}: {}", line_num + 1, e))?;
                rules.push((var_name, function));
            }
        }

        if rules.is_empty() {
            return Err("No update rules found in BooleanNet model.".to_string());
        }

        let mut variables: Vec<String> = rules.iter().map(|(it, _)| it.clone()).collect();
        for (_, function) in &rules {
            function.dump_variables(&mut variables);
        }

        let mut model = BooleanModel::new(name.as_str(), variables)?;
        for (variable, function) in rules {
            let id = model
                .find_variable(&variable)
                .ok_or_else(|| format!("Unknown variable `{}`.", variable))?;
            let function = function.into_fn_update(&model)?;
            model.set_update_function(id, function)?;
        }

        Ok(model)
    }
}

/// Parse a line to check if it's an update rule and extract variable name and expression.
///
/// Returns `None` if the line is not an update rule (e.g., initialization statement).
/// Returns `Some((variable_name, expression))` if it is an update rule.
fn parse_update_rule(line: &str) -> Result<Option<(String, String)>, String> {
    let line = line.trim();

    if !line.contains('*') {
        return Ok(None);
    }

    // Strip rank (digits) or `equation` prefixes.
    let line = if let Some(idx) = line.find(':') {
        let prefix = line[..idx].trim();
        if prefix == "equation" || prefix.chars().all(|c| c.is_ascii_digit()) {
            line[idx + 1..].trim()
        } else {
            return Ok(None); // Some other metadata line.
        }
    } else {
        line
    };

    let (var_name, expression) = if let Some(idx) = line.find("*=") {
        (&line[..idx], &line[idx + 2..])
    } else if let Some(idx) = line.find('*') {
        match line[idx + 1..].trim().strip_prefix('=') {
            Some(expression) => (&line[..idx], expression),
            None => return Ok(None),
        }
    } else {
        return Ok(None);
    };

    let var_name = var_name.trim();
    if var_name.is_empty() {
        return Err(format!("Empty variable name in update rule: {}", line));
    }
    Ok(Some((var_name.to_string(), strip_inline_comment(expression))))
}

/// Strip inline comments from an expression.
/// BooleanNet files can have comments at the end of lines like: `A and B #comment`
fn strip_inline_comment(expr: &str) -> String {
    match expr.find('#') {
        Some(i) => expr[..i].trim().to_string(),
        None => expr.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{BooleanModel, FnUpdate};

    #[test]
    fn test_parse_simple_booleannet() {
        let model = r#"
# Simple test model
A = True
B = False

A* = not B
B* = A and B # inline comment
"#;
        let model = BooleanModel::try_from_booleannet(model).unwrap();
        assert_eq!(2, model.num_vars());
        assert_eq!("", model.name());
        let b = model.find_variable("B").unwrap();
        assert_eq!("(A & B)", model.get_update_function(b).to_string(&model));
    }

    #[test]
    fn test_parse_booleannet_alternative_syntax() {
        let model = r#"
1: A* = True
B *= False
C *  =   False
10: D*= False
"#;
        let model = BooleanModel::try_from_booleannet(model).unwrap();
        assert_eq!(4, model.num_vars());
        let c = model.find_variable("C").unwrap();
        assert_eq!(&FnUpdate::Const(false), model.get_update_function(c));
    }

    #[test]
    fn test_parse_gitsbe_model() {
        let model = r#"
#Boolean model file in gitsbe format
modelname: test_model_run_3
fitness: 0.95
stablestate: 0110
equation: A *= ( C )
equation: B *= ( A ) and not ( C )
equation: C *= ( D )
mapping: A *= ( C )
"#;
        let model = BooleanModel::try_from_booleannet(model).unwrap();
        assert_eq!("test_model_run_3", model.name());
        let names: Vec<&str> = model.variable_names().iter().map(|it| it.as_str()).collect();
        assert_eq!(vec!["A", "B", "C", "D"], names);
        let d = model.find_variable("D").unwrap();
        assert_eq!(&FnUpdate::Var(d), model.get_update_function(d));
    }

    #[test]
    fn test_invalid_booleannet() {
        assert!(BooleanModel::try_from_booleannet("A = True").is_err());
        assert!(BooleanModel::try_from_booleannet("A* = B\nA* = C").is_err());
        assert!(BooleanModel::try_from_booleannet("A* = Random").is_err());
        assert!(BooleanModel::try_from_booleannet("* = B").is_err());
        assert!(BooleanModel::try_from_booleannet("A* = B and").is_err());
    }
}
