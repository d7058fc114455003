//! Target languages for emitted CDK code.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Supported target languages for code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    TypeScript,
    Python,
    Go,
    Java,
    CSharp,
}

impl TargetLanguage {
    /// Every supported language.
    pub const ALL: [Self; 5] = [
        Self::TypeScript,
        Self::Python,
        Self::Go,
        Self::Java,
        Self::CSharp,
    ];

    /// Returns the language identifier as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Go => "go",
            Self::Java => "java",
            Self::CSharp => "csharp",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "typescript" | "ts" => Ok(Self::TypeScript),
            "python" | "py" => Ok(Self::Python),
            "go" | "golang" => Ok(Self::Go),
            "java" => Ok(Self::Java),
            "csharp" | "cs" | "c#" => Ok(Self::CSharp),
            _ => Err(format!(
                "unknown language '{}', expected one of: typescript, python, go, java, csharp",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            TargetLanguage::from_str("typescript").unwrap(),
            TargetLanguage::TypeScript
        );
        assert_eq!(TargetLanguage::from_str("TS").unwrap(), TargetLanguage::TypeScript);
        assert_eq!(TargetLanguage::from_str("py").unwrap(), TargetLanguage::Python);
        assert_eq!(TargetLanguage::from_str("Go").unwrap(), TargetLanguage::Go);
        assert_eq!(TargetLanguage::from_str("java").unwrap(), TargetLanguage::Java);
        assert_eq!(TargetLanguage::from_str("C#").unwrap(), TargetLanguage::CSharp);
        assert!(TargetLanguage::from_str("rust").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for language in TargetLanguage::ALL {
            assert_eq!(language.to_string().parse::<TargetLanguage>(), Ok(language));
        }
    }

    #[test]
    fn test_deserialize() {
        let go: TargetLanguage = serde_json::from_str(r#""go""#).unwrap();
        assert_eq!(go, TargetLanguage::Go);

        let cs: TargetLanguage = serde_json::from_str(r#""csharp""#).unwrap();
        assert_eq!(cs, TargetLanguage::CSharp);
    }
}
