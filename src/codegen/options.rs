//! Layout options shared by every backend.

use serde::{Deserialize, Serialize};

/// Where opening braces go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracingStyle {
    /// `if (x) {`
    #[default]
    Block,
    /// Brace on its own line
    C,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub indent: String,
    pub bracing: BracingStyle,
    pub blank_lines_between_members: bool,
    /// Render `} else {` on one line (brace-style backends only)
    pub else_on_closing: bool,
    /// Parameter lists this long or longer are written one per line
    pub parameter_wrap_threshold: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            bracing: BracingStyle::Block,
            blank_lines_between_members: true,
            else_on_closing: false,
            parameter_wrap_threshold: 16,
        }
    }
}

impl GeneratorOptions {
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_bracing(mut self, bracing: BracingStyle) -> Self {
        self.bracing = bracing;
        self
    }

    pub fn with_else_on_closing(mut self, enabled: bool) -> Self {
        self.else_on_closing = enabled;
        self
    }

    pub fn with_blank_lines(mut self, enabled: bool) -> Self {
        self.blank_lines_between_members = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options: GeneratorOptions = serde_json::from_str(r#"{ "bracing": "c" }"#).unwrap();
        assert_eq!(options.bracing, BracingStyle::C);
        assert_eq!(options.indent, "    ");
        assert_eq!(options.parameter_wrap_threshold, 16);
        assert!(options.blank_lines_between_members);
    }
}
