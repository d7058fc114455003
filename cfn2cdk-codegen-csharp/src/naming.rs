//! C#-specific naming conventions.

use cfn2cdk_codegen::language::NamingConvention;
use cfn2cdk_core::{to_camel_case, to_pascal_case};

fn escape_csharp_reserved(name: &str) -> String {
    format!("@{}", name)
}

/// C# naming conventions.
pub const CSHARP_NAMING: NamingConvention = NamingConvention {
    class_name: to_pascal_case,
    file_name: to_pascal_case,
    variable_name: to_camel_case,
    // Props classes use PascalCase setters
    property_name: to_pascal_case,
    reserved_words: &[
        "abstract",
        "as",
        "base",
        "bool",
        "break",
        "byte",
        "case",
        "catch",
        "char",
        "checked",
        "class",
        "const",
        "continue",
        "decimal",
        "default",
        "delegate",
        "do",
        "double",
        "else",
        "enum",
        "event",
        "explicit",
        "extern",
        "false",
        "finally",
        "fixed",
        "float",
        "for",
        "foreach",
        "goto",
        "if",
        "implicit",
        "in",
        "int",
        "interface",
        "internal",
        "is",
        "lock",
        "long",
        "namespace",
        "new",
        "null",
        "object",
        "operator",
        "out",
        "override",
        "params",
        "private",
        "protected",
        "public",
        "readonly",
        "ref",
        "return",
        "sbyte",
        "sealed",
        "short",
        "sizeof",
        "stackalloc",
        "static",
        "string",
        "struct",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "uint",
        "ulong",
        "unchecked",
        "unsafe",
        "ushort",
        "using",
        "virtual",
        "void",
        "volatile",
        "while",
        // Constructor parameters
        "id",
        "props",
        "scope",
    ],
    escape_reserved: escape_csharp_reserved,
};
