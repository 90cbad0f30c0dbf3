use crate::codec::PlaceholderSyntax;
use crate::error::ConfigError;

/// Options for a mutation session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MangleConfig {
    pub placeholder: PlaceholderSyntax,
}

impl MangleConfig {
    /// Config with custom placeholder markers; see [`PlaceholderSyntax::new`].
    pub fn with_markers(
        open: impl Into<String>,
        close: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            placeholder: PlaceholderSyntax::new(open, close)?,
        })
    }
}
