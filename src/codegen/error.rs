//! Errors raised while rendering a tree.

use thiserror::Error;

use crate::tree::BinaryOperator;

/// A tree the selected backend cannot express. Rendering stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("{language} does not support {construct}{}", in_member(.member))]
    Unsupported {
        construct: String,
        language: &'static str,
        member: Option<String>,
    },

    #[error("{language} has no token for the {operator} operator")]
    UnmappedOperator {
        operator: BinaryOperator,
        language: &'static str,
    },

    #[error("{language} cannot express literal: {reason}")]
    InvalidLiteral { reason: String, language: &'static str },
}

fn in_member(member: &Option<String>) -> String {
    match member {
        Some(name) => format!(" (in `{name}`)"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = RenderError::Unsupported {
            construct: "goto statements".to_string(),
            language: "vb",
            member: Some("Run".to_string()),
        };
        assert_eq!(err.to_string(), "vb does not support goto statements (in `Run`)");

        let err = RenderError::UnmappedOperator {
            operator: BinaryOperator::Assign,
            language: "vb",
        };
        assert_eq!(err.to_string(), "vb has no token for the assign operator");
    }
}
