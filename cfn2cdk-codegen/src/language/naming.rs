//! Naming conventions for different target languages.

/// Language-specific naming conventions.
///
/// Defines how logical IDs and CloudFormation property names become class,
/// file, variable and property names, and how reserved words are escaped.
#[derive(Debug, Clone, Copy)]
pub struct NamingConvention {
    /// Transform a stack name to a class name (e.g., "network-stack" -> "NetworkStack")
    pub class_name: fn(&str) -> String,
    /// Transform a class name to a file stem (e.g., "NetworkStack" -> "network_stack")
    pub file_name: fn(&str) -> String,
    /// Transform a logical ID to a local variable name (e.g., "MyVPC" -> "myVpc")
    pub variable_name: fn(&str) -> String,
    /// Transform a top-level property name (e.g., "CidrBlock" -> "cidr_block")
    pub property_name: fn(&str) -> String,
    /// List of reserved words in the language, plus names the generated class uses itself
    pub reserved_words: &'static [&'static str],
    /// Escape a reserved word (e.g., "class" -> "@class" in C#)
    pub escape_reserved: fn(&str) -> String,
}

impl NamingConvention {
    /// Check if a name is a reserved word.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name)
    }

    /// Get a safe name, escaping if necessary.
    pub fn safe_name(&self, name: &str) -> String {
        if self.is_reserved(name) {
            (self.escape_reserved)(name)
        } else {
            name.to_string()
        }
    }

    /// Transform and make safe for use as a type name.
    pub fn type_name(&self, name: &str) -> String {
        let transformed = (self.class_name)(name);
        self.safe_name(&transformed)
    }

    /// Transform for use as a file stem.
    pub fn file_name(&self, name: &str) -> String {
        (self.file_name)(name)
    }

    /// Transform and make safe for use as a local variable.
    pub fn variable(&self, logical_id: &str) -> String {
        let transformed = (self.variable_name)(logical_id);
        if transformed.is_empty() {
            return self.safe_name("resource");
        }
        if transformed.starts_with(|c: char| c.is_ascii_digit()) {
            return format!("r{transformed}");
        }
        self.safe_name(&transformed)
    }

    /// Transform a property name. Property names are member names, so they
    /// are not escaped.
    pub fn property(&self, name: &str) -> String {
        (self.property_name)(name)
    }
}
