// SPDX-License-Identifier: Apache-2.0

use crate::error::PixError;

/// One decoded TLV entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub tag: String,
    pub value: String,
}

impl Field {
    /// Sub-fields of a template value such as tag 26 or 62.
    #[must_use]
    pub fn nested(&self) -> Option<Vec<Field>> {
        parse_fields(&self.value).ok()
    }
}

/// Largest value a two-digit length prefix can describe.
pub const MAX_VALUE_CHARS: usize = 99;

/// Appends `tag` + zero-padded length + `value`. Length counts characters.
pub fn push_field(out: &mut String, tag: &str, value: &str) -> Result<(), PixError> {
    let len = value.chars().count();
    if len > MAX_VALUE_CHARS {
        return Err(PixError::FieldTooLong {
            tag: tag.to_string(),
            len,
        });
    }
    out.push_str(tag);
    out.push_str(&format!("{len:02}"));
    out.push_str(value);
    Ok(())
}

pub fn encode_field(tag: &str, value: &str) -> Result<String, PixError> {
    let mut out = String::with_capacity(4 + value.len());
    push_field(&mut out, tag, value)?;
    Ok(out)
}

/// Splits `input` into consecutive top-level fields.
pub fn parse_fields(input: &str) -> Result<Vec<Field>, PixError> {
    let chars: Vec<char> = input.chars().collect();
    let mut fields = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        if pos + 4 > chars.len() {
            return Err(PixError::InvalidCode(format!(
                "truncated field header at offset {pos}"
            )));
        }
        let tag: String = chars[pos..pos + 2].iter().collect();
        let len_text: String = chars[pos + 2..pos + 4].iter().collect();
        if !tag.chars().all(|c| c.is_ascii_digit()) {
            return Err(PixError::InvalidCode(format!("non-numeric tag `{tag}`")));
        }
        let len: usize = len_text
            .parse()
            .map_err(|_| PixError::InvalidCode(format!("bad length `{len_text}` for tag {tag}")))?;
        let start = pos + 4;
        let end = start + len;
        if end > chars.len() {
            return Err(PixError::InvalidCode(format!(
                "field {tag} overruns the code"
            )));
        }
        fields.push(Field {
            tag,
            value: chars[start..end].iter().collect(),
        });
        pos = end;
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_characters() {
        assert_eq!(encode_field("60", "São Paulo").expect("field"), "6009São Paulo");
        assert_eq!(encode_field("58", "BR").expect("field"), "5802BR");
        assert_eq!(encode_field("05", "").expect("field"), "0500");
    }

    #[test]
    fn over_long_value_is_rejected() {
        let value = "x".repeat(100);
        assert_eq!(
            encode_field("62", &value),
            Err(PixError::FieldTooLong {
                tag: "62".to_string(),
                len: 100
            })
        );
        assert!(encode_field("62", &"x".repeat(99)).is_ok());
    }

    #[test]
    fn parse_reads_nested_values() {
        let fields = parse_fields("26180014br.gov.bcb.pix5802BR").expect("fields");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].value, "BR");
        let nested = fields[0].nested().expect("nested");
        assert_eq!(nested[0].value, "br.gov.bcb.pix");
    }

    #[test]
    fn parse_rejects_truncation() {
        assert!(parse_fields("5805BR").is_err());
        assert!(parse_fields("58").is_err());
        assert!(parse_fields("5x02BR").is_err());
    }
}
