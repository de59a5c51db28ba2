//! Pandoc option schema
//!
//! A read-only table of every pandoc command-line option, its value type and
//! the values it accepts. The table is a `static` slice and the lookup index is
//! built once on first use; nothing can mutate either afterwards.

use crate::core::value::{MetaValue, Scalar};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Declared value type of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Boolean,
    String,
    Number,
    File,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Schema entry for one option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSchema {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub description: &'static str,
    /// Only `true` is accepted
    pub flag_only: bool,
    /// Closed set of accepted values; empty means unconstrained
    #[serde(skip_serializing_if = "unconstrained")]
    pub choices: &'static [&'static str],
}

impl OptionSchema {
    /// Check a value against this entry
    pub fn accepts(&self, value: &MetaValue) -> bool {
        if self.flag_only && value.as_bool() != Some(true) {
            return false;
        }
        match self.option_type {
            OptionType::Boolean => matches!(value, MetaValue::Bool(_)),
            OptionType::Number => match value {
                MetaValue::Scalar(Scalar::Number(_)) => true,
                MetaValue::Scalar(Scalar::String(s)) => is_numeric(s),
                _ => false,
            },
            OptionType::String | OptionType::File => {
                self.choices.is_empty() || self.choices.contains(&value.string_form().as_str())
            }
        }
    }
}

fn unconstrained(choices: &&'static [&'static str]) -> bool {
    choices.is_empty()
}

/// Numeric strings as JavaScript's `Number()` reads them: blank strings count
/// as zero, `Infinity` is spelled out, and unsigned `0x`/`0o`/`0b` literals
/// are accepted. `inf` and `NaN` are not numbers.
fn is_numeric(s: &str) -> bool {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return true;
    }
    if let Some((radix, digits)) = radix_literal(trimmed) {
        return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    }
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return true;
    }
    unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && trimmed.parse::<f64>().is_ok()
}

fn radix_literal(s: &str) -> Option<(u32, &str)> {
    let (prefix, digits) = s.split_at_checked(2)?;
    match prefix {
        "0x" | "0X" => Some((16, digits)),
        "0o" | "0O" => Some((8, digits)),
        "0b" | "0B" => Some((2, digits)),
        _ => None,
    }
}

const fn option(
    name: &'static str,
    option_type: OptionType,
    flag_only: bool,
    choices: &'static [&'static str],
    description: &'static str,
) -> OptionSchema {
    OptionSchema {
        name,
        option_type,
        description,
        flag_only,
        choices,
    }
}

use OptionType as T;

/// Every option pandoc accepts on the command line
pub static PANDOC_OPTIONS: &[OptionSchema] = &[
    option("from", T::String, false, &[], "Input format"),
    option("to", T::String, false, &[], "Output format"),
    option("output", T::File, false, &[], "Output file path"),
    option("data-dir", T::File, false, &[], "Data directory"),
    option("metadata", T::String, false, &[], "Set metadata field"),
    option("metadata-file", T::File, false, &[], "Read metadata from file"),
    option("defaults", T::File, false, &[], "Read defaults from file"),
    option("file-scope", T::Boolean, false, &[], "Parse each file individually"),
    option("sandbox", T::Boolean, false, &[], "Run in sandbox mode"),
    option("standalone", T::Boolean, false, &[], "Produce standalone document"),
    option("template", T::File, false, &[], "Use custom template"),
    option("variable", T::String, false, &[], "Set template variable"),
    option("variable-json", T::String, false, &[], "Set template variable from JSON"),
    option("wrap", T::String, false, &["auto", "none", "preserve"], "Text wrapping behavior"),
    option("ascii", T::Boolean, false, &[], "Use ASCII characters only"),
    option("toc", T::Boolean, false, &[], "Include table of contents"),
    option("toc-depth", T::Number, false, &[], "Maximum depth for table of contents"),
    option("lof", T::Boolean, false, &[], "Include list of figures"),
    option("lot", T::Boolean, false, &[], "Include list of tables"),
    option("number-sections", T::Boolean, false, &[], "Number sections"),
    option("number-offset", T::String, false, &[], "Offset for section numbers"),
    option("top-level-division", T::String, false, &["section", "chapter", "part"], "Top-level division type"),
    option("extract-media", T::File, false, &[], "Extract media to directory"),
    option("resource-path", T::String, false, &[], "Resource search path"),
    option("include-in-header", T::File, false, &[], "Include file in header"),
    option("include-before-body", T::File, false, &[], "Include file before body"),
    option("include-after-body", T::File, false, &[], "Include file after body"),
    option("no-highlight", T::Boolean, true, &[], "Disable syntax highlighting"),
    option("highlight-style", T::String, false, &["STYLE", "FILE"], "Syntax highlighting style"),
    option("syntax-definition", T::File, false, &[], "Custom syntax definition"),
    option("dpi", T::Number, false, &[], "DPI for images"),
    option("eol", T::String, false, &["crlf", "lf", "native"], "Line ending style"),
    option("columns", T::Number, false, &[], "Column width"),
    option("preserve-tabs", T::Boolean, false, &[], "Preserve tabs"),
    option("tab-stop", T::Number, false, &[], "Tab stop width"),
    option("pdf-engine", T::String, false, &["pdflatex", "lualatex", "xelatex", "wkhtmltopdf", "weasyprint", "pagedjs-cli", "prince", "context", "pdfroff"], "PDF rendering engine"),
    option("pdf-engine-opt", T::String, false, &[], "PDF engine options"),
    option("reference-doc", T::File, false, &[], "Reference document for styling"),
    option("self-contained", T::Boolean, false, &[], "Produce self-contained document"),
    option("embed-resources", T::Boolean, false, &[], "Embed resources in document"),
    option("link-images", T::Boolean, false, &[], "Link to images instead of embedding"),
    option("request-header", T::String, false, &[], "HTTP request header"),
    option("no-check-certificate", T::Boolean, false, &[], "Disable certificate checking"),
    option("abbreviations", T::File, false, &[], "Abbreviations file"),
    option("indented-code-classes", T::String, false, &[], "Classes for indented code blocks"),
    option("default-image-extension", T::String, false, &[], "Default image extension"),
    option("filter", T::String, false, &[], "Pandoc filter"),
    option("lua-filter", T::String, false, &[], "Lua filter"),
    option("shift-heading-level-by", T::Number, false, &[], "Shift heading levels"),
    option("base-header-level", T::Number, false, &[], "Base header level"),
    option("track-changes", T::String, false, &["accept", "reject", "all"], "Track changes mode"),
    option("strip-comments", T::Boolean, false, &[], "Strip HTML comments"),
    option("reference-links", T::Boolean, false, &[], "Use reference links"),
    option("reference-location", T::String, false, &["block", "section", "document"], "Reference link location"),
    option("figure-caption-position", T::String, false, &["above", "below"], "Figure caption position"),
    option("table-caption-position", T::String, false, &["above", "below"], "Table caption position"),
    option("markdown-headings", T::String, false, &["setext", "atx"], "Markdown heading style"),
    option("list-tables", T::Boolean, false, &[], "Use list tables"),
    option("listings", T::Boolean, false, &[], "Use listings package"),
    option("incremental", T::Boolean, false, &[], "Incremental slides"),
    option("slide-level", T::Number, false, &[], "Slide level"),
    option("section-divs", T::Boolean, false, &[], "Wrap sections in divs"),
    option("html-q-tags", T::Boolean, false, &[], "Use HTML q tags"),
    option("email-obfuscation", T::String, false, &["none", "javascript", "references"], "Email obfuscation method"),
    option("id-prefix", T::String, false, &[], "ID prefix"),
    option("title-prefix", T::String, false, &[], "Title prefix"),
    option("css", T::String, false, &[], "CSS stylesheet"),
    option("epub-subdirectory", T::String, false, &[], "EPUB subdirectory"),
    option("epub-cover-image", T::File, false, &[], "EPUB cover image"),
    option("epub-title-page", T::Boolean, false, &[], "Include EPUB title page"),
    option("epub-metadata", T::File, false, &[], "EPUB metadata file"),
    option("epub-embed-font", T::File, false, &[], "Embed font in EPUB"),
    option("split-level", T::Number, false, &[], "Split level for chunked HTML"),
    option("chunk-template", T::String, false, &[], "Chunk template"),
    option("epub-chapter-level", T::Number, false, &[], "EPUB chapter level"),
    option("ipynb-output", T::String, false, &["all", "none", "best"], "Jupyter notebook output mode"),
    option("citeproc", T::Boolean, true, &[], "Process citations with citeproc"),
    option("bibliography", T::File, false, &[], "Bibliography file"),
    option("csl", T::File, false, &[], "Citation style language file"),
    option("citation-abbreviations", T::File, false, &[], "Citation abbreviations file"),
    option("natbib", T::Boolean, true, &[], "Use natbib for citations"),
    option("biblatex", T::Boolean, true, &[], "Use biblatex for citations"),
    option("mathml", T::Boolean, true, &[], "Use MathML for math"),
    option("webtex", T::Boolean, false, &[], "Use WebTeX for math"),
    option("mathjax", T::Boolean, false, &[], "Use MathJax for math"),
    option("katex", T::Boolean, false, &[], "Use KaTeX for math"),
    option("gladtex", T::Boolean, true, &[], "Use GladTeX for math"),
    option("trace", T::Boolean, false, &[], "Enable tracing"),
    option("dump-args", T::Boolean, false, &[], "Dump arguments"),
    option("ignore-args", T::Boolean, false, &[], "Ignore arguments"),
    option("verbose", T::Boolean, true, &[], "Verbose output"),
    option("quiet", T::Boolean, true, &[], "Quiet output"),
    option("fail-if-warnings", T::Boolean, false, &[], "Fail on warnings"),
    option("log", T::File, false, &[], "Log file"),
    option("bash-completion", T::Boolean, true, &[], "Generate bash completion"),
    option("list-input-formats", T::Boolean, true, &[], "List input formats"),
    option("list-output-formats", T::Boolean, true, &[], "List output formats"),
    option("list-extensions", T::Boolean, false, &[], "List extensions"),
    option("list-highlight-languages", T::Boolean, true, &[], "List highlight languages"),
    option("list-highlight-styles", T::Boolean, true, &[], "List highlight styles"),
    option("print-default-template", T::String, false, &[], "Print default template"),
    option("print-default-data-file", T::File, false, &[], "Print default data file"),
    option("print-highlight-style", T::String, false, &["STYLE", "FILE"], "Print highlight style"),
    option("version", T::Boolean, true, &[], "Show version"),
    option("help", T::Boolean, true, &[], "Show help"),
];

static INDEX: LazyLock<HashMap<&'static str, &'static OptionSchema>> =
    LazyLock::new(|| PANDOC_OPTIONS.iter().map(|o| (o.name, o)).collect());

/// Look up an option by name (without leading dashes)
pub fn lookup(name: &str) -> Option<&'static OptionSchema> {
    INDEX.get(name).copied()
}

/// Whether pandoc knows an option of this name
pub fn is_valid_option(name: &str) -> bool {
    INDEX.contains_key(name)
}

/// Validate a value for an option. Unknown options never validate.
pub fn validate(name: &str, value: &MetaValue) -> bool {
    lookup(name).is_some_and(|schema| schema.accepts(value))
}

/// Iterate the table in declaration order
pub fn iter() -> impl Iterator<Item = &'static OptionSchema> {
    PANDOC_OPTIONS.iter()
}
