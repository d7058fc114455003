//! TypeScript-specific naming conventions.

use cfn2cdk_codegen::language::NamingConvention;
use cfn2cdk_core::{to_camel_case, to_pascal_case};

fn escape_ts_reserved(name: &str) -> String {
    format!("_{}", name)
}

fn keep(name: &str) -> String {
    name.to_string()
}

/// TypeScript naming conventions.
pub const TS_NAMING: NamingConvention = NamingConvention {
    // Classes use PascalCase
    class_name: to_pascal_case,
    // Files are named after the class
    file_name: keep,
    // Locals use camelCase
    variable_name: to_camel_case,
    // Construct props use camelCase
    property_name: to_camel_case,
    reserved_words: &[
        // JavaScript reserved words
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "let",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        // TypeScript reserved words
        "any",
        "as",
        "async",
        "await",
        "boolean",
        "constructor",
        "declare",
        "implements",
        "interface",
        "module",
        "namespace",
        "never",
        "number",
        "object",
        "package",
        "private",
        "protected",
        "public",
        "readonly",
        "require",
        "static",
        "string",
        "symbol",
        "type",
        "undefined",
        "unknown",
        // Names the generated class uses
        "cdk",
        "Construct",
        "id",
        "props",
        "scope",
    ],
    escape_reserved: escape_ts_reserved,
};
