//! A library for predicting the effect of drug combinations on ensembles of Boolean network
//! models.
//!
//! Every model of an ensemble is perturbed by each drug combination of a `PerturbationPanel`
//! (drug targets are locked to a constant value), its attractors are computed by an
//! `AttractorSolver` and summarised into a *global output* using the weighted output nodes of
//! `ModelOutputs`. A combination is then compared against all its immediate sub-combinations
//! to decide whether the drugs act synergistically, either for every model separately
//! (see `ResponseModel`), or for the whole ensemble (see `PerturbationPanel::response_excess`).
//!
//! The Boolean model itself is represented by a `BooleanModel`, which is a fully specified
//! network: every variable has exactly one `FnUpdate` function. Models can be read from
//! `.bnet` files, or from BooleanNet-style equation files (`A *= B and not C`), which also
//! covers the `.gitsbe` model format.

use fxhash::FxHashMap;
use std::iter::Map;
use std::ops::Range;

pub mod analyzer;
pub mod attractors;
pub mod config;
pub mod drugs;
pub mod error;
pub mod outputs;
pub mod perturbations;
pub mod reports;

/// **(internal)** Implements `.bnet` parser for `BooleanModel`.
mod _bnet_parser;
/// **(internal)** Implements BooleanNet (and `.gitsbe`) parser for `BooleanModel`.
mod _booleannet_parser;
/// **(internal)** Tokenizer and parser of update function expressions.
mod _expression_parser;
/// **(internal)** Utility methods for `BinaryOp`.
mod _impl_binary_op;
/// **(internal)** Utility methods for `BooleanModel`.
mod _impl_boolean_model;
/// **(internal)** `BooleanModel` to `.bnet` string.
mod _impl_boolean_model_to_bnet;
/// **(internal)** Utility methods for `FnUpdate`.
mod _impl_fn_update;
/// **(internal)** Utility methods for `VariableId`.
mod _impl_variable_id;

/// A type-safe index of a variable inside a `BooleanModel`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VariableId(usize);

/// Possible binary boolean operators that can appear in `FnUpdate`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    Iff,
    Imp,
}

/// A boolean formula which references variables of the associated `BooleanModel`.
///
/// An update function specifies the evolution rules for one specific variable of
/// a `BooleanModel`. Drug perturbations replace the function of every drug target
/// with a `Const`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FnUpdate {
    Const(bool),
    Var(VariableId),
    Not(Box<FnUpdate>),
    Binary(BinaryOp, Box<FnUpdate>, Box<FnUpdate>),
}

/// A named, fully specified Boolean network.
///
/// Variables are kept in declaration order, and this order also determines the meaning of
/// attractor strings: the `i`-th character of an attractor is the value of the `i`-th variable.
///
/// Variables without an explicit update function (i.e. inputs) use the identity
/// function `x = x`, so that they keep their value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BooleanModel {
    name: String,
    variables: Vec<String>,
    update_functions: Vec<FnUpdate>,
    variable_to_index: FxHashMap<String, VariableId>,
}

/// An iterator over all `VariableId`s of a `BooleanModel`.
pub type VariableIdIterator = Map<Range<usize>, fn(usize) -> VariableId>;

/// **(internal)** Non-empty, non-comment (`#`) lines of a tab separated input file.
pub(crate) fn content_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(|it| it.trim_end_matches('\r'))
        .filter(|it| !it.trim().is_empty() && !it.trim_start().starts_with('#'))
}
