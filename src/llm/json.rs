//! Extraction of JSON payloads from model output.
//!
//! Models are told to answer with bare JSON but routinely wrap it in
//! markdown fences or commentary. A balanced delimiter scan (string- and
//! escape-aware) pulls the first complete object or array out of whatever
//! came back; strict parsing happens at the callers.

/// First complete `{...}` in the text.
pub fn extract_object(text: &str) -> Option<&str> {
    extract_balanced(text, b'{', b'}')
}

/// First complete `[...]` in the text.
pub fn extract_array(text: &str) -> Option<&str> {
    extract_balanced(text, b'[', b']')
}

fn extract_balanced(text: &str, open: u8, close: u8) -> Option<&str> {
    let start = text.find(open as char)?;
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if escape {
            escape = false;
            continue;
        }
        if b == b'\\' && in_string {
            escape = true;
            continue;
        }
        if b == b'"' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(&text[start..=i]);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_object_amid_commentary() {
        let text = r#"Sure! Here's the result: {"intent": "help"} hope that helps"#;
        assert_eq!(extract_object(text), Some(r#"{"intent": "help"}"#));
    }

    #[test]
    fn handles_nesting() {
        let text = r#"{"a": {"b": 1}, "c": [2, 3]}"#;
        assert_eq!(extract_object(text), Some(text));
    }

    #[test]
    fn ignores_braces_inside_strings() {
        let text = r#"{"text": "value with \"quotes\" and } inside"}"#;
        assert_eq!(extract_object(text), Some(text));
    }

    #[test]
    fn strips_markdown_fences() {
        let text = "```json\n[{\"operation\": \"add\"}]\n```";
        assert_eq!(extract_array(text), Some(r#"[{"operation": "add"}]"#));
    }

    #[test]
    fn array_extraction_skips_leading_prose() {
        let text = "The operations are: [1, [2, 3]] done";
        assert_eq!(extract_array(text), Some("[1, [2, 3]]"));
    }

    #[test]
    fn absent_payload_is_none() {
        assert_eq!(extract_object("no json here"), None);
        assert_eq!(extract_array("{\"an\": \"object\"}"), None);
        assert_eq!(extract_object("{unterminated"), None);
    }
}
