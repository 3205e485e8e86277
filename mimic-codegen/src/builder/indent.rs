//! Indentation configuration for code generation.

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    /// Tab character, as `gofmt` writes it.
    #[default]
    Tab,
    /// Spaces with the specified width (at most 8).
    Spaces(u8),
}

impl Indent {
    /// Convert to the string representation for one indent level.
    pub fn as_str(&self) -> &'static str {
        const SPACES: &str = "        ";
        match self {
            Self::Tab => "\t",
            Self::Spaces(n) => &SPACES[..usize::from(*n).min(SPACES.len())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_as_str() {
        assert_eq!(Indent::Tab.as_str(), "\t");
        assert_eq!(Indent::Spaces(2).as_str(), "  ");
        assert_eq!(Indent::Spaces(12).as_str(), "        ");
    }

    #[test]
    fn test_default_is_tab() {
        assert_eq!(Indent::default(), Indent::Tab);
    }
}
