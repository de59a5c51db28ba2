//! Export targets
//!
//! Each entry pairs a user-facing format name with the pandoc writer, the
//! file extension of the output and the short label used in messages.

use crate::error::{PrepError, Result};
use serde::Serialize;
use std::fmt;

/// One export target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputFormat {
    /// Name accepted on the command line
    pub name: &'static str,
    /// Human-readable name
    pub label: &'static str,
    /// Pandoc writer; `None` lets pandoc infer it from the output extension
    pub writer: Option<&'static str>,
    /// Output file extension, without the leading dot
    pub extension: &'static str,
    pub short_name: &'static str,
    /// Whether the conversion runs through a LaTeX engine
    pub needs_latex: bool,
}

const fn format(
    name: &'static str,
    label: &'static str,
    writer: Option<&'static str>,
    extension: &'static str,
    short_name: &'static str,
    needs_latex: bool,
) -> OutputFormat {
    OutputFormat {
        name,
        label,
        writer,
        extension,
        short_name,
        needs_latex,
    }
}

pub static OUTPUT_FORMATS: &[OutputFormat] = &[
    format("asciidoc", "AsciiDoc", Some("asciidoc"), "adoc", "AsciiDoc", false),
    format("docx", "Word Document", Some("docx"), "docx", "Word", false),
    format("markdown", "Pandoc Markdown", Some("markdown"), "pandoc.md", "Markdown", false),
    format("html", "HTML", Some("html"), "html", "HTML", false),
    format("latex", "LaTeX", Some("latex"), "tex", "LaTeX", true),
    format("odt", "OpenDocument", Some("odt"), "odt", "OpenDocument", false),
    format("pptx", "PowerPoint", Some("pptx"), "pptx", "PowerPoint", false),
    format("epub", "ePub", Some("epub"), "epub", "ePub", false),
    format("pdf", "PDF", None, "pdf", "PDF", true),
    format("revealjs", "Reveal.js Slides", Some("revealjs"), "reveal.html", "Reveal.js", false),
    format("beamer", "Beamer Slides", Some("beamer"), "beamer.tex", "Beamer", true),
    format("rst", "reStructuredText", Some("rst"), "rst", "RST", false),
    format("dokuwiki", "DokuWiki", Some("dokuwiki"), "txt", "DokuWiki", false),
    format("mediawiki", "MediaWiki", Some("mediawiki"), "mediawiki", "MediaWiki", false),
];

impl OutputFormat {
    /// Find a format by name, case-insensitively
    pub fn lookup(name: &str) -> Result<&'static OutputFormat> {
        OUTPUT_FORMATS
            .iter()
            .find(|format| format.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| PrepError::unknown_format(name))
    }

    pub fn all() -> &'static [OutputFormat] {
        OUTPUT_FORMATS
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let html = OutputFormat::lookup("html").unwrap();
        assert_eq!(html.writer, Some("html"));
        assert_eq!(html.extension, "html");

        assert_eq!(OutputFormat::lookup("DOCX").unwrap().name, "docx");
        assert!(matches!(
            OutputFormat::lookup("rtf"),
            Err(PrepError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn test_latex_formats() {
        let latex: Vec<_> = OUTPUT_FORMATS
            .iter()
            .filter(|f| f.needs_latex)
            .map(|f| f.name)
            .collect();
        assert_eq!(latex, vec!["latex", "pdf", "beamer"]);
        assert_eq!(OutputFormat::lookup("pdf").unwrap().writer, None);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = OUTPUT_FORMATS.iter().map(|f| f.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), OUTPUT_FORMATS.len());
    }
}
