//! Cleanup and decoding of structured model output.

use serde::de::DeserializeOwned;

use crate::error::{AgenticError, Result};

/// Extract the JSON payload from model text.
///
/// Cuts everything before the first `{` or `[` (whichever comes first) and
/// after the last matching closer, which drops code fences and surrounding
/// prose. Text without a payload is only trimmed.
pub fn clean_content(content: &str) -> &str {
    let trimmed = content.trim();
    let open = match (trimmed.find('{'), trimmed.find('[')) {
        (Some(brace), Some(bracket)) => Some(brace.min(bracket)),
        (brace, bracket) => brace.or(bracket),
    };
    let Some(start) = open else {
        return trimmed;
    };
    let closer = if trimmed[start..].starts_with('{') { '}' } else { ']' };
    match trimmed.rfind(closer) {
        Some(end) if end > start => &trimmed[start..=end],
        _ => &trimmed[start..],
    }
}

/// Decode cleaned model output into `T`.
pub fn decode_output<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_json::from_str(clean_content(content))
        .map_err(|e| AgenticError::Output(format!("failed to decode structured output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn strips_json_code_fence() {
        let input = "```json\n{\"name\": \"test\", \"value\": 123}\n```";
        assert_eq!(clean_content(input), "{\"name\": \"test\", \"value\": 123}");
    }

    #[test]
    fn strips_surrounding_prose() {
        let input = "Here you go: [1, 2, 3]. Anything else?";
        assert_eq!(clean_content(input), "[1, 2, 3]");
    }

    #[test]
    fn earliest_opener_wins() {
        assert_eq!(clean_content("x [{\"a\": 1}] y"), "[{\"a\": 1}]");
        assert_eq!(clean_content("x {\"a\": [1]} y"), "{\"a\": [1]}");
    }

    #[test]
    fn plain_text_is_trimmed() {
        assert_eq!(clean_content("   simple text content   "), "simple text content");
    }

    #[test]
    fn decode_reports_output_errors() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Answer {
            value: i64,
        }

        let answer: Answer = decode_output("```\n{\"value\": 4}\n```").unwrap();
        assert_eq!(answer, Answer { value: 4 });

        let err = decode_output::<Answer>("no json here").unwrap_err();
        assert!(matches!(err, AgenticError::Output(_)));
    }
}
