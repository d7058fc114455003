//! Case conversion for CloudFormation logical IDs and property names.
//!
//! Logical IDs are usually PascalCase with embedded acronyms (`TestVPC`,
//! `SSESpecification`), so conversions split on case boundaries first and
//! treat a run of capitals as one word.

/// Split an identifier into words.
///
/// Boundaries are separators (`_`, `-`, `.`, `:`, whitespace), a lower-case
/// letter or digit followed by an upper-case letter, and the last capital of
/// an acronym that is followed by a lower-case letter.
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | '.' | ':' | '/') || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

/// Convert to PascalCase (e.g., "test_vpc" -> "TestVpc", "TestVPC" -> "TestVpc")
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert to camelCase (e.g., "TestVPC" -> "testVpc", "SSESpecification" -> "sseSpecification")
pub fn to_camel_case(s: &str) -> String {
    split_words(s)
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
        .collect()
}

/// Convert to snake_case (e.g., "TestVPC" -> "test_vpc")
pub fn to_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Convert to kebab-case (e.g., "MyStack" -> "my-stack")
pub fn to_kebab_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("TestVPC"), vec!["Test", "VPC"]);
        assert_eq!(split_words("VPCGatewayAttachment"), vec!["VPC", "Gateway", "Attachment"]);
        assert_eq!(split_words("SG1"), vec!["SG1"]);
        assert_eq!(split_words("ec2Instance"), vec!["ec2", "Instance"]);
        assert_eq!(split_words("my-stack_name"), vec!["my", "stack", "name"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("hello"), "Hello");
        assert_eq!(to_pascal_case("hello_world"), "HelloWorld");
        assert_eq!(to_pascal_case("VpcId"), "VpcId");
        assert_eq!(to_pascal_case("VPCZoneIdentifier"), "VpcZoneIdentifier");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("TestVPC"), "testVpc");
        assert_eq!(to_camel_case("SSESpecification"), "sseSpecification");
        assert_eq!(to_camel_case("CidrIp"), "cidrIp");
        assert_eq!(to_camel_case("PrivateSecurityGroup"), "privateSecurityGroup");
        assert_eq!(to_camel_case("SG1"), "sg1");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("TestVPC"), "test_vpc");
        assert_eq!(to_snake_case("GroupDescription"), "group_description");
        assert_eq!(to_snake_case("SecurityGroupIds"), "security_group_ids");
        assert_eq!(to_snake_case("hello-world"), "hello_world");
        assert_eq!(to_snake_case(""), "");
    }

    #[test]
    fn test_to_kebab_case() {
        assert_eq!(to_kebab_case("Ec2EncryptionStack"), "ec2-encryption-stack");
        assert_eq!(to_kebab_case("my_stack"), "my-stack");
    }
}
