//! Front matter detection, stripping and extraction
//!
//! Detection is deliberately textual: after trimming, a document has front
//! matter when it starts with `---` and a second `---` appears anywhere after
//! it. Embedded documents only ever need stripping; the root document needs
//! extraction to feed the metadata compiler.

use crate::core::value::Metadata;
use log::warn;
use serde_yaml::Value;

/// Front matter delimiter
pub const DELIMITER: &str = "---";

/// Split trimmed text into (front matter block, body).
///
/// Returns `None` when there is no opening delimiter or no closing one.
fn split(markdown: &str) -> Option<(&str, &str)> {
    let trimmed = markdown.trim();
    let trailing = trimmed.strip_prefix(DELIMITER)?;
    let end = trailing.find(DELIMITER)?;
    Some((&trailing[..end], &trailing[end + DELIMITER.len()..]))
}

/// Remove a leading front matter block and return the trimmed body.
///
/// Text without a complete block comes back trimmed but otherwise unchanged.
pub fn strip(markdown: &str) -> String {
    match split(markdown) {
        Some((_, body)) => body.trim().to_string(),
        None => markdown.trim().to_string(),
    }
}

/// The raw text strictly between the delimiters, if any
pub fn block(markdown: &str) -> Option<&str> {
    split(markdown).map(|(block, _)| block)
}

/// Parse the front matter of a document into ordered metadata.
///
/// Every failure mode (no block, unterminated block, empty block, broken
/// YAML, a block that is not a mapping) yields empty metadata.
pub fn extract(markdown: &str) -> Metadata {
    let Some(block) = block(markdown) else {
        return Metadata::new();
    };
    parse_block(block)
}

/// Parse a front matter block's text
pub fn parse_block(block: &str) -> Metadata {
    if block.trim().is_empty() {
        return Metadata::new();
    }

    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(mapping)) => Metadata::from_mapping(mapping),
        Ok(Value::Null) => Metadata::new(),
        Ok(other) => {
            warn!(
                "Front matter is not a mapping (found {}), ignoring it",
                MetaKind(&other)
            );
            Metadata::new()
        }
        Err(e) => {
            warn!("Failed to parse front matter, ignoring it: {}", e);
            Metadata::new()
        }
    }
}

/// Assemble a document from optional metadata and a body
pub fn format(metadata: Option<&Metadata>, body: &str) -> crate::Result<String> {
    match metadata {
        Some(metadata) if !metadata.is_empty() => {
            let yaml = metadata.to_yaml_string()?;
            Ok(format!("{DELIMITER}\n{yaml}\n{DELIMITER}\n\n{body}"))
        }
        _ => Ok(body.to_string()),
    }
}

struct MetaKind<'a>(&'a Value);

impl std::fmt::Display for MetaKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.0 {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Tagged(_) => "tagged value",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::MetaValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_front_matter() {
        let content = "---\ntitle: Chapter\n---\n\n# Heading\n\nBody text.\n";
        assert_eq!(strip(content), "# Heading\n\nBody text.");
    }

    #[test]
    fn test_strip_without_front_matter() {
        assert_eq!(strip("  # Just a note\n"), "# Just a note");
    }

    #[test]
    fn test_strip_unterminated_front_matter_keeps_text() {
        let content = "---\ntitle: never closed\n# Heading";
        assert_eq!(strip(content), content);
    }

    #[test]
    fn test_strip_leading_whitespace_before_delimiter() {
        let content = "\n\n---\na: 1\n---\nbody";
        assert_eq!(strip(content), "body");
    }

    #[test]
    fn test_closing_delimiter_is_textual() {
        // Only the first `---` after the opening one closes the block
        let content = "---\na: 1\n---\nintro\n\n---\n\nmore";
        assert_eq!(strip(content), "intro\n\n---\n\nmore");
    }

    #[test]
    fn test_extract_metadata() {
        let content = "---\ntitle: Report\npandoc-toc: true\n---\nbody";
        let metadata = extract(content);
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("title"), Some(&MetaValue::string("Report")));
        assert_eq!(metadata.get("pandoc-toc"), Some(&MetaValue::Bool(true)));
    }

    #[test]
    fn test_extract_without_front_matter_is_empty() {
        assert!(extract("# No metadata here").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_extract_unterminated_is_empty() {
        assert!(extract("---\ntitle: x\nbody").is_empty());
    }

    #[test]
    fn test_extract_malformed_yaml_is_empty() {
        let content = "---\ntitle: \"unclosed\ntags: [a, b\n---\nbody";
        assert!(extract(content).is_empty());
    }

    #[test]
    fn test_extract_non_mapping_is_empty() {
        assert!(extract("---\n- a\n- b\n---\nbody").is_empty());
        assert!(extract("---\n---\nbody").is_empty());
    }

    #[test]
    fn test_format_round_trip() {
        let metadata = Metadata::new().with("title", "Report");
        let rendered = format(Some(&metadata), "Body").unwrap();
        assert_eq!(rendered, "---\ntitle: Report\n---\n\nBody");
        assert_eq!(extract(&rendered), metadata);
        assert_eq!(strip(&rendered), "Body");
    }

    #[test]
    fn test_format_without_metadata() {
        assert_eq!(format(None, "Body").unwrap(), "Body");
        assert_eq!(format(Some(&Metadata::new()), "Body").unwrap(), "Body");
    }
}
