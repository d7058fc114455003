//! `Fn::Sub` template string parsing.

use crate::expr::SubPart;

/// Split an `Fn::Sub` string into text and variable segments.
///
/// `${Name}` becomes a variable, `${!Name}` is an escape producing the
/// literal text `${Name}`. Adjacent text is merged.
pub fn parse_sub_template(template: &str) -> Result<Vec<SubPart>, String> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        text.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| format!("unterminated '${{' in '{template}'"))?;
        let body = &after[..end];

        if let Some(literal) = body.strip_prefix('!') {
            text.push_str("${");
            text.push_str(literal);
            text.push('}');
        } else {
            let name = body.trim();
            if name.is_empty() {
                return Err(format!("empty variable '${{}}' in '{template}'"));
            }
            if !text.is_empty() {
                parts.push(SubPart::Text(std::mem::take(&mut text)));
            }
            parts.push(SubPart::Variable(name.to_string()));
        }
        rest = &after[end + 1..];
    }

    text.push_str(rest);
    if !text.is_empty() {
        parts.push(SubPart::Text(text));
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(
            parse_sub_template("no variables").unwrap(),
            vec![SubPart::Text("no variables".into())]
        );
        assert!(parse_sub_template("").unwrap().is_empty());
    }

    #[test]
    fn test_variables_and_text() {
        assert_eq!(
            parse_sub_template("arn:${AWS::Partition}:s3:::${Bucket}/*").unwrap(),
            vec![
                SubPart::Text("arn:".into()),
                SubPart::Variable("AWS::Partition".into()),
                SubPart::Text(":s3:::".into()),
                SubPart::Variable("Bucket".into()),
                SubPart::Text("/*".into()),
            ]
        );
    }

    #[test]
    fn test_escaped_literal() {
        assert_eq!(
            parse_sub_template("${!Literal}-${Name}").unwrap(),
            vec![
                SubPart::Text("${Literal}-".into()),
                SubPart::Variable("Name".into()),
            ]
        );
    }

    #[test]
    fn test_unterminated() {
        assert!(parse_sub_template("oops ${Name").is_err());
        assert!(parse_sub_template("${}").is_err());
    }
}
