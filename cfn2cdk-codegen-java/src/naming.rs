//! Java-specific naming conventions.

use cfn2cdk_codegen::language::NamingConvention;
use cfn2cdk_core::{to_camel_case, to_pascal_case};

fn escape_java_reserved(name: &str) -> String {
    format!("{}_", name)
}

/// Java naming conventions.
pub const JAVA_NAMING: NamingConvention = NamingConvention {
    class_name: to_pascal_case,
    // Public classes live in a file of the same name
    file_name: to_pascal_case,
    variable_name: to_camel_case,
    // Builder methods
    property_name: to_camel_case,
    reserved_words: &[
        "abstract",
        "assert",
        "boolean",
        "break",
        "byte",
        "case",
        "catch",
        "char",
        "class",
        "const",
        "continue",
        "default",
        "do",
        "double",
        "else",
        "enum",
        "extends",
        "false",
        "final",
        "finally",
        "float",
        "for",
        "goto",
        "if",
        "implements",
        "import",
        "instanceof",
        "int",
        "interface",
        "long",
        "native",
        "new",
        "null",
        "package",
        "private",
        "protected",
        "public",
        "record",
        "return",
        "short",
        "static",
        "strictfp",
        "super",
        "switch",
        "synchronized",
        "this",
        "throw",
        "throws",
        "transient",
        "true",
        "try",
        "var",
        "void",
        "volatile",
        "while",
        "yield",
        // Constructor parameters
        "id",
        "props",
        "scope",
    ],
    escape_reserved: escape_java_reserved,
};
