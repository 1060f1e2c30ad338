//! Defensive parsing of model output.
//!
//! Model text may wrap a JSON payload in prose or code fences. Every consumer
//! locates the first balanced region and treats decode failure as an ordinary
//! outcome rather than an error.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Returns the first balanced region delimited by `open`/`close`, skipping
/// delimiters that appear inside JSON string literals.
pub fn first_balanced(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                let end = start + offset + c.len_utf8();
                return Some(&text[start..end]);
            }
        }
    }

    None
}

/// Decodes the first balanced `{...}` region as a JSON object.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let region = first_balanced(strip_json_fences(text), '{', '}')?;
    serde_json::from_str::<Value>(region)
        .ok()
        .filter(Value::is_object)
}

/// Decodes the first balanced `[...]` region into `T`.
pub fn extract_json_array<T: DeserializeOwned>(text: &str) -> Option<T> {
    let region = first_balanced(strip_json_fences(text), '[', ']')?;
    serde_json::from_str(region).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_first_balanced_ignores_surrounding_prose() {
        let text = "Here is the analysis: {\"a\": {\"b\": 1}} and a trailing note {x}";
        assert_eq!(first_balanced(text, '{', '}'), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_first_balanced_skips_braces_inside_strings() {
        let text = r#"{"summary": "uses } and { freely", "n": 2}"#;
        assert_eq!(first_balanced(text, '{', '}'), Some(text));
    }

    #[test]
    fn test_first_balanced_unclosed_is_none() {
        assert!(first_balanced("{\"a\": 1", '{', '}').is_none());
        assert!(first_balanced("no braces here", '{', '}').is_none());
    }

    #[test]
    fn test_extract_json_object_rejects_garbage() {
        assert!(extract_json_object("{not json}").is_none());
        assert!(extract_json_object("plain prose").is_none());
    }

    #[test]
    fn test_extract_json_object_from_fenced_output() {
        let value = extract_json_object("```json\n{\"fitScore\": 78}\n```").unwrap();
        assert_eq!(value["fitScore"], 78);
    }

    #[test]
    fn test_extract_json_array_of_names() {
        let names: Vec<String> =
            extract_json_array("Sure: [\"JobAlignmentAgent\", \"InterviewCoachAgent\"]").unwrap();
        assert_eq!(names, vec!["JobAlignmentAgent", "InterviewCoachAgent"]);
    }
}
