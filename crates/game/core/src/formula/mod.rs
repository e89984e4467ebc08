//! Arithmetic formulas over subject and target stats.
//!
//! Formulas such as `"4 + 2 * a.level"` are parsed once when content loads,
//! so a malformed expression or an unknown property is a load error rather
//! than a battle-time surprise. `a` is the acting creature, `b` the target.
mod error;
mod parser;

use std::fmt;

pub use error::FormulaError;

/// Which actor a variable reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// `a`, the acting creature.
    Subject,
    /// `b`, the creature being affected.
    Target,
}

/// Properties formulas may read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum FormulaVar {
    Level,
    Hp,
    Mp,
    Mhp,
    Mmp,
    Atk,
    Def,
    Mat,
    Mdf,
    Agi,
}

/// Value source for formula variables.
pub trait FormulaScope {
    fn formula_value(&self, var: FormulaVar) -> f64;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Debug, PartialEq)]
enum Expr {
    Const(f64),
    Var((Side, FormulaVar)),
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, subject: &dyn FormulaScope, target: &dyn FormulaScope) -> f64 {
        match self {
            Expr::Const(value) => *value,
            Expr::Var((Side::Subject, var)) => subject.formula_value(*var),
            Expr::Var((Side::Target, var)) => target.formula_value(*var),
            Expr::Neg(inner) => -inner.eval(subject, target),
            Expr::Binary(op, lhs, rhs) => {
                let lhs = lhs.eval(subject, target);
                let rhs = rhs.eval(subject, target);
                match op {
                    BinaryOp::Add => lhs + rhs,
                    BinaryOp::Sub => lhs - rhs,
                    BinaryOp::Mul => lhs * rhs,
                    BinaryOp::Div if rhs == 0.0 => 0.0,
                    BinaryOp::Div => lhs / rhs,
                }
            }
        }
    }
}

/// A parsed formula that keeps its source text for display and serialization.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parses `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`FormulaError`] on malformed input or unknown variables.
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        Ok(Self {
            source: source.trim().to_owned(),
            expr: parser::parse(source)?,
        })
    }

    /// Constant formula.
    pub fn constant(value: f64) -> Self {
        Self {
            source: value.to_string(),
            expr: Expr::Const(value),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the formula. Division by zero yields 0.
    pub fn evaluate(&self, subject: &dyn FormulaScope, target: &dyn FormulaScope) -> f64 {
        let value = self.expr.eval(subject, target);
        if value.is_finite() { value } else { 0.0 }
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Formula {
    type Error = FormulaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Formula> for String {
    fn from(value: Formula) -> Self {
        value.source
    }
}
