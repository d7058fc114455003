//! Indentation configuration for code generation.

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// Spaces with the specified width (e.g., 2 or 4).
    Spaces(u8),
    /// Tab character.
    Tab,
}

impl Indent {
    /// 2-space indentation (TypeScript).
    pub const TYPESCRIPT: Self = Self::Spaces(2);

    /// 4-space indentation (Python, Java, C#).
    pub const FOUR: Self = Self::Spaces(4);

    /// Tab indentation (Go).
    pub const GO: Self = Self::Tab;

    /// The string for one indent level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spaces(2) => "  ",
            Self::Spaces(4) => "    ",
            // Fallback to 4 whitespaces
            Self::Spaces(_) => "    ",
            Self::Tab => "\t",
        }
    }

    /// The string for `level` indent levels.
    pub fn repeat(&self, level: usize) -> String {
        self.as_str().repeat(level)
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::FOUR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_as_str() {
        assert_eq!(Indent::Spaces(2).as_str(), "  ");
        assert_eq!(Indent::Spaces(4).as_str(), "    ");
        assert_eq!(Indent::Spaces(3).as_str(), "    ");
        assert_eq!(Indent::Tab.as_str(), "\t");
    }

    #[test]
    fn test_indent_repeat() {
        assert_eq!(Indent::TYPESCRIPT.repeat(2), "    ");
        assert_eq!(Indent::GO.repeat(3), "\t\t\t");
        assert_eq!(Indent::FOUR.repeat(0), "");
    }

    #[test]
    fn test_default() {
        assert_eq!(Indent::default(), Indent::FOUR);
    }
}
