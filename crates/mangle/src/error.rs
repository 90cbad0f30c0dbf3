use html::SelectorError;
use std::fmt;

/// Malformed placeholder text found while reconstructing a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// A `#` open token for a value that was pair-encoded, whose `/` close token never appears.
    Unterminated { id: usize },
    /// Placeholder digits that do not form a valid index.
    InvalidId { text: String },
    /// A literal token referring to an index the value table never issued.
    UnknownId { id: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Unterminated { id } => {
                write!(f, "placeholder {id} opened but never closed")
            }
            DecodeError::InvalidId { text } => write!(f, "invalid placeholder index {text:?}"),
            DecodeError::UnknownId { id } => write!(f, "placeholder {id} has no recorded value"),
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateError {
    ChunkMismatch { strings: usize, values: usize },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::ChunkMismatch { strings, values } => write!(
                f,
                "template has {strings} string chunks for {values} values (expected {})",
                values + 1
            ),
        }
    }
}

impl std::error::Error for TemplateError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidMarker { marker: String, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMarker { marker, reason } => {
                write!(f, "invalid placeholder marker {marker:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Any failure surfaced by a mutation session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MangleError {
    Decode(DecodeError),
    Template(TemplateError),
    Config(ConfigError),
    Selector(SelectorError),
}

impl fmt::Display for MangleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MangleError::Decode(err) => write!(f, "decode failed: {err}"),
            MangleError::Template(err) => write!(f, "bad template: {err}"),
            MangleError::Config(err) => write!(f, "bad configuration: {err}"),
            MangleError::Selector(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for MangleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MangleError::Decode(err) => Some(err),
            MangleError::Template(err) => Some(err),
            MangleError::Config(err) => Some(err),
            MangleError::Selector(err) => Some(err),
        }
    }
}

impl From<DecodeError> for MangleError {
    fn from(err: DecodeError) -> Self {
        MangleError::Decode(err)
    }
}

impl From<TemplateError> for MangleError {
    fn from(err: TemplateError) -> Self {
        MangleError::Template(err)
    }
}

impl From<ConfigError> for MangleError {
    fn from(err: ConfigError) -> Self {
        MangleError::Config(err)
    }
}

impl From<SelectorError> for MangleError {
    fn from(err: SelectorError) -> Self {
        MangleError::Selector(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn messages_name_the_placeholder() {
        assert_eq!(
            DecodeError::Unterminated { id: 3 }.to_string(),
            "placeholder 3 opened but never closed"
        );
        let err = MangleError::from(DecodeError::UnknownId { id: 9 });
        assert_eq!(err.to_string(), "decode failed: placeholder 9 has no recorded value");
        assert!(err.source().is_some());
    }

    #[test]
    fn selector_errors_pass_through_verbatim() {
        let inner = html::SelectorList::parse("a[").expect_err("unterminated attribute");
        let err = MangleError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }
}
