use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for template operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Holds the raw template text and its filename so every error can point
/// back into the document.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Span of the key declaring `name` (`"Name":` in JSON, `Name:` in YAML).
    pub fn key_span(&self, name: &str) -> Option<SourceSpan> {
        find_key_span(&self.src, name)
    }

    /// Span of the first whole-word occurrence of `name`.
    pub fn text_span(&self, name: &str) -> Option<SourceSpan> {
        find_word_span(&self.src, name)
    }

    /// Create a syntax error from a YAML error.
    pub fn yaml_error(&self, source: serde_yaml::Error) -> Box<Error> {
        let span = source
            .location()
            .map(|loc| SourceSpan::from((loc.index(), 1)));
        Box::new(Error::Syntax {
            src: self.named_source(),
            span,
            message: source.to_string(),
        })
    }

    /// Create a syntax error from a JSON error.
    pub fn json_error(&self, source: serde_json::Error) -> Box<Error> {
        let span = line_column_offset(&self.src, source.line(), source.column())
            .map(|offset| SourceSpan::from((offset, 1)));
        Box::new(Error::Syntax {
            src: self.named_source(),
            span,
            message: source.to_string(),
        })
    }

    /// Create a validation error without a span.
    pub fn error(&self, message: impl Into<String>) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span: None,
            message: message.into(),
        })
    }

    /// Create a missing section error.
    pub fn missing_section_error(&self, section: &str) -> Box<Error> {
        Box::new(Error::MissingSection {
            src: self.named_source(),
            section: section.to_string(),
        })
    }

    /// Create a validation error pointing at the declaration of `logical_id`.
    pub fn validation_error(&self, logical_id: &str, message: impl Into<String>) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span: self.key_span(logical_id),
            message: message.into(),
        })
    }

    /// Create a duplicate logical ID error.
    pub fn duplicate_error(&self, name: &str, first: &str, second: &str) -> Box<Error> {
        Box::new(Error::DuplicateLogicalId {
            src: self.named_source(),
            span: self.key_span(name),
            name: name.to_string(),
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    /// Create a malformed intrinsic error.
    pub fn malformed_intrinsic_error(
        &self,
        function: &str,
        logical_id: &str,
        reason: impl Into<String>,
    ) -> Box<Error> {
        Box::new(Error::MalformedIntrinsic {
            src: self.named_source(),
            span: self.text_span(function).or_else(|| self.key_span(logical_id)),
            function: function.to_string(),
            logical_id: logical_id.to_string(),
            reason: reason.into(),
        })
    }

    /// Create an unsupported function error.
    pub fn unsupported_function_error(&self, function: &str, logical_id: &str) -> Box<Error> {
        Box::new(Error::UnsupportedFunction {
            src: self.named_source(),
            span: self.text_span(function),
            function: function.to_string(),
            logical_id: logical_id.to_string(),
        })
    }

    /// Create an unresolved reference error.
    pub fn unresolved_reference_error(
        &self,
        name: &str,
        expected: &str,
        logical_id: &str,
    ) -> Box<Error> {
        Box::new(Error::UnresolvedReference {
            src: self.named_source(),
            span: self.text_span(name),
            name: name.to_string(),
            expected: expected.to_string(),
            logical_id: logical_id.to_string(),
        })
    }

    /// Create an invalid resource type error.
    pub fn resource_type_error(&self, logical_id: &str, value: &str) -> Box<Error> {
        Box::new(Error::InvalidResourceType {
            src: self.named_source(),
            span: self.text_span(value),
            logical_id: logical_id.to_string(),
            value: value.to_string(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("check that the template path exists and is readable"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template: {message}")]
    #[diagnostic(code(cfn2cdk::syntax_error))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("template has no '{section}' section")]
    #[diagnostic(
        code(cfn2cdk::missing_section),
        help("a template must declare at least one resource under '{section}'")
    )]
    MissingSection {
        #[source_code]
        src: NamedSource<String>,
        section: String,
    },

    #[error("logical ID '{name}' is declared in both {first} and {second}")]
    #[diagnostic(
        code(cfn2cdk::duplicate_logical_id),
        help("parameters and resources share the Ref namespace, rename one of them")
    )]
    DuplicateLogicalId {
        #[source_code]
        src: NamedSource<String>,
        #[label("declared here")]
        span: Option<SourceSpan>,
        name: String,
        first: String,
        second: String,
    },

    #[error("malformed {function} in '{logical_id}': {reason}")]
    #[diagnostic(code(cfn2cdk::malformed_intrinsic))]
    MalformedIntrinsic {
        #[source_code]
        src: NamedSource<String>,
        #[label("in this call")]
        span: Option<SourceSpan>,
        function: String,
        logical_id: String,
        reason: String,
    },

    #[error("unsupported intrinsic function '{function}' in '{logical_id}'")]
    #[diagnostic(
        code(cfn2cdk::unsupported_function),
        help(
            "supported functions are Ref, Condition, Fn::GetAtt, Fn::FindInMap, Fn::Select, Fn::Split, Fn::Join, Fn::Sub, Fn::If, Fn::Equals, Fn::And, Fn::Or, Fn::Not, Fn::ImportValue, Fn::Base64, Fn::GetAZs and Fn::Cidr"
        )
    )]
    UnsupportedFunction {
        #[source_code]
        src: NamedSource<String>,
        #[label("used here")]
        span: Option<SourceSpan>,
        function: String,
        logical_id: String,
    },

    #[error("'{logical_id}' references undeclared {expected} '{name}'")]
    #[diagnostic(code(cfn2cdk::unresolved_reference))]
    UnresolvedReference {
        #[source_code]
        src: NamedSource<String>,
        #[label("not declared")]
        span: Option<SourceSpan>,
        name: String,
        expected: String,
        logical_id: String,
    },

    #[error("resource '{logical_id}' has invalid type '{value}'")]
    #[diagnostic(
        code(cfn2cdk::invalid_resource_type),
        help("resource types look like AWS::S3::Bucket or Custom::MyResource")
    )]
    InvalidResourceType {
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid type")]
        span: Option<SourceSpan>,
        logical_id: String,
        value: String,
    },

    #[error("{message}")]
    #[diagnostic(code(cfn2cdk::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
        message: String,
    },
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ':'
}

/// Find the span of a mapping key, in either JSON (`"Name":`) or YAML (`Name:`) form.
pub(crate) fn find_key_span(src: &str, name: &str) -> Option<SourceSpan> {
    for (offset, _) in src.match_indices(name) {
        let before = &src[..offset];
        let after = &src[offset + name.len()..];

        let json_key = before.ends_with('"') && after.starts_with('"') && {
            after[1..].trim_start_matches([' ', '\t']).starts_with(':')
        };
        let line_start = before.rsplit('\n').next().unwrap_or(before);
        let yaml_key = line_start.chars().all(|c| c == ' ' || c == '\t')
            && after.trim_start_matches([' ', '\t']).starts_with(':')
            && !after.trim_start_matches([' ', '\t']).starts_with("::");

        if json_key || yaml_key {
            return Some(SourceSpan::from((offset, name.len())));
        }
    }
    None
}

/// Find the first whole-word occurrence of `name`.
pub(crate) fn find_word_span(src: &str, name: &str) -> Option<SourceSpan> {
    src.match_indices(name).find_map(|(offset, _)| {
        let before_ok = src[..offset].chars().next_back().is_none_or(|c| !is_ident_char(c));
        let after_ok = src[offset + name.len()..]
            .chars()
            .next()
            .is_none_or(|c| !is_ident_char(c));
        (before_ok && after_ok).then(|| SourceSpan::from((offset, name.len())))
    })
}

fn line_column_offset(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    Some((line_start + column.saturating_sub(1)).min(src.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_key_span_yaml() {
        let src = "Resources:\n  MyBucket:\n    Type: AWS::S3::Bucket\n";
        let span = find_key_span(src, "MyBucket").unwrap();
        assert_eq!(span.offset(), 13);
        assert_eq!(span.len(), 8);
    }

    #[test]
    fn test_find_key_span_json() {
        let src = r#"{"Resources": {"MyBucket" : {"Type": "AWS::S3::Bucket"}}}"#;
        let span = find_key_span(src, "MyBucket").unwrap();
        assert_eq!(&src[span.offset()..span.offset() + span.len()], "MyBucket");
    }

    #[test]
    fn test_find_key_span_skips_values() {
        let src = "Outputs:\n  Id:\n    Value: !Ref Bucket\nResources:\n  Bucket:\n    Type: AWS::S3::Bucket\n";
        let span = find_key_span(src, "Bucket").unwrap();
        assert_eq!(&src[span.offset() - 2..span.offset()], "  ");
        assert!(src[span.offset()..].starts_with("Bucket:\n"));
    }

    #[test]
    fn test_find_word_span_whole_words() {
        let src = "Value: !Ref VpcId\nOther: !Ref Vpc\n";
        let span = find_word_span(src, "Vpc").unwrap();
        assert_eq!(&src[span.offset()..], "Vpc\n");
    }
}
