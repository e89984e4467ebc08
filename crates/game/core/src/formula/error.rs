use crate::error::{ErrorSeverity, GameError};

/// Errors raised while parsing a formula string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error("unexpected '{found}' at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("unexpected end of formula")]
    UnexpectedEnd,

    #[error("trailing input at offset {0}")]
    TrailingInput(usize),
}

impl GameError for FormulaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "FORMULA_UNEXPECTED_TOKEN",
            Self::UnknownVariable(_) => "FORMULA_UNKNOWN_VARIABLE",
            Self::UnexpectedEnd => "FORMULA_UNEXPECTED_END",
            Self::TrailingInput(_) => "FORMULA_TRAILING_INPUT",
        }
    }
}
