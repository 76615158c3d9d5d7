use serde::Deserialize;

/// Conversational prefixes some sites render in front of the user's text.
const SPEAKER_PREFIXES: [&str; 3] = ["you said:", "you:", "question:"];

pub const DEFAULT_LABEL_MAX_CHARS: usize = 30;
pub const DEFAULT_ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LabelOptions {
    /// Maximum number of characters kept from the cleaned text.
    pub max_chars: usize,
    /// Appended only when the text was cut.
    pub ellipsis: String,
    pub strip_prefixes: bool,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_LABEL_MAX_CHARS,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
            strip_prefixes: true,
        }
    }
}

/// Builds the row text for the message at zero-based `index`: `"{n}. {body}"`.
pub fn entry_label(index: usize, raw_text: &str, options: &LabelOptions) -> String {
    format!("{}. {}", index + 1, label_body(raw_text, options))
}

/// Cleans, de-prefixes and truncates raw message text.
pub fn label_body(raw_text: &str, options: &LabelOptions) -> String {
    let cleaned = collapse_whitespace(raw_text);
    let body = if options.strip_prefixes {
        match strip_speaker_prefix(&cleaned) {
            // A message consisting of nothing but the prefix keeps its text.
            "" => cleaned.as_str(),
            stripped => stripped,
        }
    } else {
        cleaned.as_str()
    };
    truncate_chars(body, options.max_chars, &options.ellipsis)
}

/// Collapses every whitespace run (line breaks included) to one space and trims.
pub fn collapse_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Removes one leading speaker prefix, compared case-insensitively.
pub fn strip_speaker_prefix(text: &str) -> &str {
    for prefix in SPEAKER_PREFIXES {
        let Some(head) = text.get(..prefix.len()) else {
            continue;
        };
        if head.eq_ignore_ascii_case(prefix) {
            return text[prefix.len()..].trim_start();
        }
    }
    text
}

/// Keeps the first `max_chars` characters, appending `ellipsis` when anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize, ellipsis: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ellipsis),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_runs_collapse_and_trim() {
        let body = label_body("  Hello\n\nworld  ", &LabelOptions::default());
        assert_eq!(body, "Hello world");
    }

    #[test]
    fn long_text_is_cut_to_thirty_chars_with_ellipsis() {
        let raw = "abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHI";
        assert_eq!(raw.chars().count(), 45);
        let body = label_body(raw, &LabelOptions::default());
        assert_eq!(body, "abcdefghijklmnopqrstuvwxyz0123...");
    }

    #[test]
    fn exactly_thirty_chars_is_not_marked() {
        let raw = "a".repeat(30);
        assert_eq!(label_body(&raw, &LabelOptions::default()), raw);
    }

    #[test]
    fn speaker_prefixes_are_stripped_case_insensitively() {
        let options = LabelOptions::default();
        assert!(label_body("You said: what is rust?", &options).starts_with("what is rust?"));
        assert_eq!(label_body("YOU: hi", &options), "hi");
        assert_eq!(label_body("question:   why", &options), "why");
        assert_eq!(label_body("Yourself is fine", &options), "Yourself is fine");
    }

    #[test]
    fn bare_prefix_keeps_original_text() {
        assert_eq!(label_body("You said:", &LabelOptions::default()), "You said:");
    }

    #[test]
    fn prefix_stripping_can_be_disabled() {
        let options = LabelOptions {
            strip_prefixes: false,
            ..LabelOptions::default()
        };
        assert_eq!(label_body("You: hi", &options), "You: hi");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let raw = "가".repeat(31);
        let body = truncate_chars(&raw, 30, "...");
        assert_eq!(body, format!("{}...", "가".repeat(30)));
    }

    #[test]
    fn entry_label_prefixes_one_based_ordinal() {
        assert_eq!(entry_label(0, "first", &LabelOptions::default()), "1. first");
        assert_eq!(entry_label(9, " tenth ", &LabelOptions::default()), "10. tenth");
    }
}
