//! Cleanup of collaborator-returned text.
//!
//! Generated text arrives with two kinds of noise: code-fence markers
//! around structured payloads, and Markdown syntax inside prose meant for
//! plain-text display. Patterns are compiled once.

use std::sync::OnceLock;

use regex::Regex;

struct MarkdownPatterns {
    rules: Vec<(Regex, &'static str)>,
}

static MARKDOWN_PATTERNS: OnceLock<MarkdownPatterns> = OnceLock::new();

fn markdown_patterns() -> &'static MarkdownPatterns {
    MARKDOWN_PATTERNS.get_or_init(|| MarkdownPatterns {
        rules: vec![
            (Regex::new(r"\[[^\]]*\]\([^)]*\)").expect("valid regex"), ""),
            (Regex::new(r"`{1,3}[^`]*`{1,3}").expect("valid regex"), ""),
            (Regex::new(r"\*+").expect("valid regex"), ""),
            (Regex::new(r"#+\s*").expect("valid regex"), ""),
            (Regex::new(r"-+\s*").expect("valid regex"), ""),
            (Regex::new(r"\n\s*\n").expect("valid regex"), "\n"),
        ],
    })
}

/// Strip Markdown syntax from generated prose: emphasis markers, headings,
/// list dashes, links, inline code, and blank-line runs.
#[must_use]
pub fn clean_markdown(text: &str) -> String {
    let mut cleaned = text.to_string();
    for (pattern, replacement) in &markdown_patterns().rules {
        cleaned = pattern.replace_all(&cleaned, *replacement).into_owned();
    }
    cleaned.trim().to_string()
}

/// Strip code-fence markers wrapping a structured payload, when present.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let mut inner = text.trim();
    if let Some(rest) = inner.strip_prefix("```json") {
        inner = rest;
    } else if let Some(rest) = inner.strip_prefix("```") {
        inner = rest;
    }
    if let Some(rest) = inner.strip_suffix("```") {
        inner = rest;
    }
    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_markdown_strips_emphasis_and_headings() {
        let text = "# Advice\n\n**Eat** *slowly* and choose `whole grains`.";
        let cleaned = clean_markdown(text);
        assert!(!cleaned.contains('#'));
        assert!(!cleaned.contains('*'));
        assert!(!cleaned.contains('`'));
        assert!(cleaned.contains("Eat slowly"));
    }

    #[test]
    fn test_clean_markdown_strips_links_and_list_dashes() {
        let text = "- choose [low GI foods](https://example.com) daily";
        let cleaned = clean_markdown(text);
        assert_eq!(cleaned, "choose  daily");
    }

    #[test]
    fn test_clean_markdown_collapses_blank_lines() {
        let cleaned = clean_markdown("line one\n\n\nline two");
        assert_eq!(cleaned, "line one\nline two");
    }

    #[test]
    fn test_strip_fenced_json() {
        let payload = "```json\n[{\"id\": 1}]\n```";
        assert_eq!(strip_code_fences(payload), "[{\"id\": 1}]");
    }

    #[test]
    fn test_strip_bare_fences() {
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
    }

    #[test]
    fn test_unfenced_text_passes_through() {
        assert_eq!(strip_code_fences("  [1, 2]  "), "[1, 2]");
    }
}
