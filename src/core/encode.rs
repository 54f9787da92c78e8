//! Prompt encoding of source files
//!
//! The encoded form is what gets token-counted, so it must match what the
//! prompt builder eventually sends.

use crate::core::model::SourceFile;
use crate::host::PromptEncoder;

/// Encodes a file as a path header followed by a fenced code block
#[derive(Debug, Clone, Copy, Default)]
pub struct FencedEncoder;

/// Longest run of consecutive backticks in `text`
fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Backtick fence long enough that `content` cannot close it early
pub fn code_fence(content: &str) -> String {
    "`".repeat(longest_backtick_run(content).max(2) + 1)
}

impl PromptEncoder for FencedEncoder {
    fn encode(&self, file: &SourceFile) -> String {
        let fence = code_fence(&file.content);

        let mut out = String::with_capacity(file.content.len() + file.path.len() + 32);
        out.push_str("File: ");
        out.push_str(&file.path);
        out.push('\n');
        out.push_str(&fence);
        out.push_str(&file.language_id);
        out.push('\n');
        out.push_str(&file.content);
        if !file.content.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&fence);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let file = SourceFile::new("src/lib.rs", "pub fn f() {}\n", "rust");
        let encoded = FencedEncoder.encode(&file);
        assert_eq!(encoded, "File: src/lib.rs\n```rust\npub fn f() {}\n```\n");
    }

    #[test]
    fn test_encode_adds_trailing_newline() {
        let file = SourceFile::new("a.py", "print(1)", "python");
        let encoded = FencedEncoder.encode(&file);
        assert!(encoded.ends_with("print(1)\n```\n"));
    }

    #[test]
    fn test_encode_grows_fence_past_content() {
        let file = SourceFile::new("README.md", "```sh\nls\n```\n", "markdown");
        let encoded = FencedEncoder.encode(&file);
        assert!(encoded.starts_with("File: README.md\n````markdown\n"));
        assert!(encoded.ends_with("\n````\n"));
    }

    #[test]
    fn test_longest_backtick_run() {
        assert_eq!(longest_backtick_run("no ticks"), 0);
        assert_eq!(longest_backtick_run("a `b` ``c`` d"), 2);
    }
}
