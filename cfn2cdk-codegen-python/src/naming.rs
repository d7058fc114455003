//! Python-specific naming conventions.

use cfn2cdk_codegen::language::NamingConvention;
use cfn2cdk_core::{to_pascal_case, to_snake_case};

fn escape_py_reserved(name: &str) -> String {
    format!("{}_", name)
}

/// Python naming conventions.
pub const PY_NAMING: NamingConvention = NamingConvention {
    class_name: to_pascal_case,
    // Modules use snake_case
    file_name: to_snake_case,
    variable_name: to_snake_case,
    // Keyword arguments use snake_case
    property_name: to_snake_case,
    reserved_words: &[
        // Keywords
        "and",
        "as",
        "assert",
        "async",
        "await",
        "break",
        "class",
        "continue",
        "def",
        "del",
        "elif",
        "else",
        "except",
        "finally",
        "for",
        "from",
        "global",
        "if",
        "import",
        "in",
        "is",
        "lambda",
        "nonlocal",
        "not",
        "or",
        "pass",
        "raise",
        "return",
        "try",
        "while",
        "with",
        "yield",
        "False",
        "None",
        "True",
        // Builtins a local would shadow
        "id",
        "list",
        "dict",
        "str",
        "type",
        "object",
        // Names the generated class uses
        "cdk",
        "construct_id",
        "kwargs",
        "scope",
        "self",
        "super",
    ],
    escape_reserved: escape_py_reserved,
};
