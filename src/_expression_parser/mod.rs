use crate::BinaryOp::*;
use crate::{BinaryOp, BooleanModel, FnUpdate};
use std::convert::TryFrom;
use std::iter::Peekable;
use std::str::Chars;

/// **(internal)** A helper enum for representing a parsed `FnUpdate` whose variables are
/// not resolved against a `BooleanModel` yet.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum ExpressionTemp {
    Const(bool),
    Var(String),
    Not(Box<ExpressionTemp>),
    Binary(BinaryOp, Box<ExpressionTemp>, Box<ExpressionTemp>),
}

impl TryFrom<&str> for ExpressionTemp {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let tokens = tokenize_group(&mut value.chars().peekable(), true)?;
        Ok(*(parse_expression(&tokens)?))
    }
}

impl ExpressionTemp {
    /// Push names of all variables referenced in this expression into `output`, in the order
    /// of their first appearance, skipping names that are already present.
    pub(crate) fn dump_variables(&self, output: &mut Vec<String>) {
        match self {
            ExpressionTemp::Const(_) => (),
            ExpressionTemp::Var(name) => {
                if !output.contains(name) {
                    output.push(name.clone());
                }
            }
            ExpressionTemp::Not(inner) => inner.dump_variables(output),
            ExpressionTemp::Binary(_, l, r) => {
                l.dump_variables(output);
                r.dump_variables(output);
            }
        }
    }

    /// Resolve all variable names using the given `model`, producing an actual `FnUpdate`.
    pub(crate) fn into_fn_update(self, model: &BooleanModel) -> Result<FnUpdate, String> {
        Ok(match self {
            ExpressionTemp::Const(value) => FnUpdate::Const(value),
            ExpressionTemp::Var(name) => {
                let id = model
                    .find_variable(&name)
                    .ok_or_else(|| format!("Unknown variable `{}`.", name))?;
                FnUpdate::Var(id)
            }
            ExpressionTemp::Not(inner) => FnUpdate::mk_not(inner.into_fn_update(model)?),
            ExpressionTemp::Binary(op, l, r) => {
                FnUpdate::mk_binary(op, l.into_fn_update(model)?, r.into_fn_update(model)?)
            }
        })
    }
}

/// **(internal)** An enum of possible tokens occurring in a string representation of
/// an update function.
///
/// Operators can be written either symbolically (`!`, `&`, `|`) or using the BooleanNet
/// keywords (`not`, `and`, `or`).
#[derive(Debug, Eq, PartialEq)]
enum Token {
    Not,                // '!' or 'not'
    And,                // '&' or 'and'
    Or,                 // '|' or 'or'
    Xor,                // '^'
    Imp,                // '=>'
    Iff,                // '<=>'
    Name(String),       // 'name'
    Tokens(Vec<Token>), // A block of tokens inside parentheses
}

/// **(internal)** Process a peekable iterator of characters into a vector of `Token`s.
///
/// The outer method always consumes the opening parenthesis and the recursive call consumes the
/// closing parenthesis. Use `top_level` to indicate that there will be no closing parenthesis.
fn tokenize_group(data: &mut Peekable<Chars>, top_level: bool) -> Result<Vec<Token>, String> {
    let mut output = Vec::new();
    while let Some(c) = data.next() {
        match c {
            c if c.is_whitespace() => { /* Skip whitespace */ }
            '!' => output.push(Token::Not),
            '&' => output.push(Token::And),
            '|' => output.push(Token::Or),
            '^' => output.push(Token::Xor),
            '=' => {
                if Some('>') == data.next() {
                    output.push(Token::Imp);
                } else {
                    return Err("Expected '>' after '='.".to_string());
                }
            }
            '<' => {
                if Some('=') == data.next() && Some('>') == data.next() {
                    output.push(Token::Iff)
                } else {
                    return Err("Expected '<=>'.".to_string());
                }
            }
            ')' => {
                return if !top_level {
                    Ok(output)
                } else {
                    Err("Unexpected ')'.".to_string())
                };
            }
            '(' => {
                let tokens = tokenize_group(data, false)?;
                output.push(Token::Tokens(tokens));
            }
            c if is_valid_in_name(c) => {
                let mut name = vec![c];
                while let Some(c) = data.peek() {
                    if !is_valid_in_name(*c) {
                        break;
                    } else {
                        name.push(*c);
                        data.next();
                    }
                }
                let name: String = name.into_iter().collect();
                output.push(match name.as_str() {
                    "not" | "NOT" => Token::Not,
                    "and" | "AND" => Token::And,
                    "or" | "OR" => Token::Or,
                    _ => Token::Name(name),
                });
            }
            _ => return Err(format!("Unexpected '{}'.", c)),
        }
    }
    if top_level {
        Ok(output)
    } else {
        Err("Expected ')'.".to_string())
    }
}

/// **(internal)** Check if given char can appear in a name.
fn is_valid_in_name(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '{' || c == '}'
}

/// **(internal)** Parse an `ExpressionTemp` using the recursive steps.
fn parse_expression(data: &[Token]) -> Result<Box<ExpressionTemp>, String> {
    iff(data)
}

/// **(internal)** Utility method to find first occurrence of a specific token in the token tree.
fn index_of_first(data: &[Token], token: Token) -> Option<usize> {
    data.iter().position(|t| *t == token)
}

/// **(internal)** Recursive parsing step 1: extract `<=>` operators.
fn iff(data: &[Token]) -> Result<Box<ExpressionTemp>, String> {
    Ok(if let Some(i) = index_of_first(data, Token::Iff) {
        Box::new(ExpressionTemp::Binary(
            Iff,
            imp(&data[..i])?,
            iff(&data[(i + 1)..])?,
        ))
    } else {
        imp(data)?
    })
}

/// **(internal)** Recursive parsing step 2: extract `=>` operators.
fn imp(data: &[Token]) -> Result<Box<ExpressionTemp>, String> {
    Ok(if let Some(i) = index_of_first(data, Token::Imp) {
        Box::new(ExpressionTemp::Binary(
            Imp,
            or(&data[..i])?,
            imp(&data[(i + 1)..])?,
        ))
    } else {
        or(data)?
    })
}

/// **(internal)** Recursive parsing step 3: extract `|` operators.
fn or(data: &[Token]) -> Result<Box<ExpressionTemp>, String> {
    Ok(if let Some(i) = index_of_first(data, Token::Or) {
        Box::new(ExpressionTemp::Binary(
            Or,
            and(&data[..i])?,
            or(&data[(i + 1)..])?,
        ))
    } else {
        and(data)?
    })
}

/// **(internal)** Recursive parsing step 4: extract `&` operators.
fn and(data: &[Token]) -> Result<Box<ExpressionTemp>, String> {
    Ok(if let Some(i) = index_of_first(data, Token::And) {
        Box::new(ExpressionTemp::Binary(
            And,
            xor(&data[..i])?,
            and(&data[(i + 1)..])?,
        ))
    } else {
        xor(data)?
    })
}

/// **(internal)** Recursive parsing step 5: extract `^` operators.
fn xor(data: &[Token]) -> Result<Box<ExpressionTemp>, String> {
    Ok(if let Some(i) = index_of_first(data, Token::Xor) {
        Box::new(ExpressionTemp::Binary(
            Xor,
            terminal(&data[..i])?,
            xor(&data[(i + 1)..])?,
        ))
    } else {
        terminal(data)?
    })
}

/// **(internal)** Recursive parsing step 6: extract terminals and negations.
fn terminal(data: &[Token]) -> Result<Box<ExpressionTemp>, String> {
    if data.is_empty() {
        return Err("Expected formula, found nothing.".to_string());
    }
    if data[0] == Token::Not {
        return Ok(Box::new(ExpressionTemp::Not(terminal(&data[1..])?)));
    }
    if data.len() == 1 {
        match &data[0] {
            Token::Name(name) => {
                return Ok(Box::new(match name.as_str() {
                    "true" | "True" | "TRUE" | "1" => ExpressionTemp::Const(true),
                    "false" | "False" | "FALSE" | "0" => ExpressionTemp::Const(false),
                    _ => ExpressionTemp::Var(name.clone()),
                }));
            }
            Token::Tokens(inner) => return parse_expression(inner),
            _ => {}
        }
    }
    Err(format!("Unexpected: {:?}. Expecting formula.", data))
}
