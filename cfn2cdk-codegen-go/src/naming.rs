//! Go-specific naming conventions.

use cfn2cdk_codegen::language::NamingConvention;
use cfn2cdk_core::{to_camel_case, to_pascal_case, to_snake_case};

fn escape_go_reserved(name: &str) -> String {
    format!("{}_", name)
}

/// Go naming conventions.
pub const GO_NAMING: NamingConvention = NamingConvention {
    class_name: to_pascal_case,
    file_name: to_snake_case,
    // Unexported locals use camelCase
    variable_name: to_camel_case,
    // Props struct fields are exported
    property_name: to_pascal_case,
    reserved_words: &[
        // Keywords
        "break",
        "case",
        "chan",
        "const",
        "continue",
        "default",
        "defer",
        "else",
        "fallthrough",
        "for",
        "func",
        "go",
        "goto",
        "if",
        "import",
        "interface",
        "map",
        "package",
        "range",
        "return",
        "select",
        "struct",
        "switch",
        "type",
        "var",
        // Predeclared identifiers
        "any",
        "append",
        "bool",
        "cap",
        "copy",
        "error",
        "false",
        "float64",
        "int",
        "len",
        "make",
        "new",
        "nil",
        "string",
        "true",
        // Names the generated function uses
        "cdk",
        "construct",
        "constructs",
        "id",
        "jsii",
        "props",
        "scope",
        "sprops",
        "stack",
    ],
    escape_reserved: escape_go_reserved,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_naming_file() {
        assert_eq!(GO_NAMING.file_name("Ec2Stack"), "ec2_stack");
    }

    #[test]
    fn test_go_naming_property() {
        assert_eq!(GO_NAMING.property("VPCZoneIdentifier"), "VpcZoneIdentifier");
        assert_eq!(GO_NAMING.property("CidrBlock"), "CidrBlock");
    }

    #[test]
    fn test_go_reserved_words() {
        assert!(GO_NAMING.is_reserved("range"));
        assert!(GO_NAMING.is_reserved("stack"));
        assert_eq!(GO_NAMING.variable("Map"), "map_");
        assert_eq!(GO_NAMING.variable("TestVPC"), "testVpc");
    }
}
