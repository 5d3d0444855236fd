//! Output formatting configuration for rendered templates.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Indentation character.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// Indent with spaces
    #[default]
    Space,
    /// Indent with tabs
    Tab,
}

/// How a template document is laid out when encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateFormat {
    /// Indentation character
    pub indent: IndentStyle,

    /// Indent width in characters
    pub indent_size: usize,

    /// Whether the output ends with a newline
    pub trailing_newline: bool,
}

impl Default for TemplateFormat {
    fn default() -> Self {
        Self {
            indent: IndentStyle::Space,
            indent_size: 4,
            trailing_newline: true,
        }
    }
}

impl TemplateFormat {
    /// Compact single-line output.
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            indent: IndentStyle::Space,
            indent_size: 0,
            trailing_newline: false,
        }
    }

    /// Parse and validate a format from JSON.
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed input and
    /// [`Error::InvalidConfig`] when the settings are inconsistent.
    pub fn from_json(input: &str) -> Result<Self> {
        let format: Self = serde_json::from_str(input)?;
        format.validate()?;
        Ok(format)
    }

    /// Check that the settings describe a usable layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for tab indentation with a zero width.
    pub fn validate(&self) -> Result<()> {
        if self.indent == IndentStyle::Tab && self.indent_size == 0 {
            return Err(Error::invalid_config("tab indentation requires a non-zero indentSize"));
        }
        Ok(())
    }

    /// Encode `value` with this layout.
    ///
    /// An indent size of zero with space indentation produces compact output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] when `value` fails to serialize.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let mut buf = if self.indent == IndentStyle::Space && self.indent_size == 0 {
            serde_json::to_vec(value)?
        } else {
            let unit = match self.indent {
                IndentStyle::Space => b' ',
                IndentStyle::Tab => b'\t',
            };
            let indent = vec![unit; self.indent_size];
            let mut buf = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_slice());
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut ser)?;
            buf
        };

        if self.trailing_newline {
            buf.push(b'\n');
        }
        Ok(buf)
    }
}
