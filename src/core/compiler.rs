//! Front matter to pandoc arguments
//!
//! Keys prefixed with `pandoc-` become command-line arguments, everything
//! else stays document metadata. Argument order follows key order because
//! pandoc lets later arguments override earlier ones.

use crate::core::schema;
use crate::core::value::{MetaValue, Metadata};
use crate::io::search::PathSearch;
use crate::io::store::DocumentStore;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Prefix marking a metadata key as a pandoc argument
pub const ARGUMENT_PREFIX: &str = "pandoc-";

/// Arguments whose values name files and go through [`PathSearch`]
pub const FILE_PATH_ARGUMENTS: &[&str] = &[
    "template",
    "css",
    "bibliography",
    "csl",
    "reference-doc",
    "reference-odt",
    "reference-docx",
    "epub-cover-image",
    "epub-stylesheet",
    "include-in-header",
    "include-before-body",
    "include-after-body",
    "lua-filter",
    "filter",
    "metadata-file",
    "abbreviations",
    "syntax-definition",
];

pub fn is_file_path_argument(name: &str) -> bool {
    FILE_PATH_ARGUMENTS.contains(&name)
}

/// One pandoc command-line argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub value: Option<String>,
}

impl Argument {
    /// A bare `--name` flag
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// A `--name=value` argument
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "--{}={}", self.name, value),
            None => write!(f, "--{}", self.name),
        }
    }
}

/// What to do with arguments the option schema does not accept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SchemaPolicy {
    /// Pass everything through silently
    Forward,
    /// Pass everything through, logging a warning for rejected values
    #[default]
    Warn,
    /// Leave rejected values out of the argument list
    Drop,
}

/// Output of [`MetadataCompiler::compile`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledMetadata {
    /// Metadata with every argument key removed
    pub metadata: Metadata,
    /// Arguments in front matter order
    pub arguments: Vec<Argument>,
    /// The `pandoc-` keys consumed, whether or not they produced arguments
    pub argument_keys: Vec<String>,
}

impl CompiledMetadata {
    /// Arguments rendered as `--name` / `--name=value`
    pub fn to_args(&self) -> Vec<String> {
        self.arguments.iter().map(Argument::to_string).collect()
    }
}

/// Splits metadata into pass-through metadata and pandoc arguments
pub struct MetadataCompiler<'a> {
    store: &'a dyn DocumentStore,
    search: PathSearch,
    policy: SchemaPolicy,
}

impl<'a> MetadataCompiler<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            search: PathSearch::default(),
            policy: SchemaPolicy::default(),
        }
    }

    pub fn with_search(mut self, search: PathSearch) -> Self {
        self.search = search;
        self
    }

    pub fn with_policy(mut self, policy: SchemaPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Compile metadata read from a document in `current_dir`, with
    /// `root_dir` as the root for file searches.
    pub async fn compile(
        &self,
        metadata: &Metadata,
        current_dir: &Path,
        root_dir: &Path,
    ) -> CompiledMetadata {
        let mut compiled = CompiledMetadata::default();

        for (key, value) in metadata.iter() {
            let Some(name) = key.strip_prefix(ARGUMENT_PREFIX) else {
                compiled.metadata.insert(key, value.clone());
                continue;
            };
            compiled.argument_keys.push(key.to_string());

            if name.is_empty() {
                warn!("Ignoring front matter key {:?} with no argument name", key);
                continue;
            }

            match value {
                MetaValue::Bool(true) => {
                    if self.admit(name, value) {
                        compiled.arguments.push(Argument::flag(name));
                    }
                }
                MetaValue::Bool(false) | MetaValue::Null => {
                    debug!("Argument --{} switched off", name);
                }
                MetaValue::List(items) => {
                    for item in items {
                        match item {
                            MetaValue::Null => {}
                            MetaValue::List(_) | MetaValue::Nested(_) => {
                                warn!(
                                    "Skipping {} element of {}: only scalar values can be arguments",
                                    item.type_name(),
                                    key
                                );
                            }
                            _ => {
                                if let Some(argument) =
                                    self.argument(name, item, current_dir, root_dir).await
                                {
                                    compiled.arguments.push(argument);
                                }
                            }
                        }
                    }
                }
                MetaValue::Scalar(_) => {
                    if let Some(argument) = self.argument(name, value, current_dir, root_dir).await
                    {
                        compiled.arguments.push(argument);
                    }
                }
                MetaValue::Nested(_) => {
                    warn!(
                        "Skipping {}: a mapping cannot be passed as a command-line value",
                        key
                    );
                }
            }
        }

        debug!(
            "Compiled {} arguments from {} keys ({} kept as metadata)",
            compiled.arguments.len(),
            metadata.len(),
            compiled.metadata.len()
        );
        compiled
    }

    /// Build a `--name=value` argument for one scalar value
    async fn argument(
        &self,
        name: &str,
        value: &MetaValue,
        current_dir: &Path,
        root_dir: &Path,
    ) -> Option<Argument> {
        if !self.admit(name, value) {
            return None;
        }
        let raw = value.to_arg_value()?;
        let value = if is_file_path_argument(name) {
            self.search
                .resolve(self.store, &raw, current_dir, root_dir)
                .await
        } else {
            raw
        };
        Some(Argument::with_value(name, value))
    }

    /// Apply the schema policy to one argument occurrence
    fn admit(&self, name: &str, value: &MetaValue) -> bool {
        if self.policy == SchemaPolicy::Forward || schema::validate(name, value) {
            return true;
        }
        let reason = rejection_reason(name, value);
        match self.policy {
            SchemaPolicy::Drop => {
                warn!("Dropping --{}: {}", name, reason);
                false
            }
            _ => {
                warn!("Passing --{} through despite {}", name, reason);
                true
            }
        }
    }
}

/// A `pandoc-` key whose value the option schema rejects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub key: String,
    pub reason: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.reason)
    }
}

/// Check every `pandoc-` key against the option schema.
///
/// Values are checked the way the compiler would pass them: list elements
/// one by one, `false` and null never.
pub fn violations(metadata: &Metadata) -> Vec<Violation> {
    let mut found = Vec::new();
    for (key, value) in metadata.iter() {
        let Some(name) = key.strip_prefix(ARGUMENT_PREFIX) else {
            continue;
        };
        let values: Vec<&MetaValue> = match value {
            MetaValue::Bool(false) | MetaValue::Null => continue,
            MetaValue::List(items) => items.iter().filter(|item| !item.is_null()).collect(),
            other => vec![other],
        };
        for value in values {
            if !schema::validate(name, value) {
                found.push(Violation {
                    key: key.to_string(),
                    reason: rejection_reason(name, value),
                });
            }
        }
    }
    found
}

fn rejection_reason(name: &str, value: &MetaValue) -> String {
    match schema::lookup(name) {
        None if name.is_empty() => "no argument name".to_string(),
        None => "unknown option".to_string(),
        Some(option) if option.flag_only => {
            format!("--{} is a flag and only accepts true", name)
        }
        Some(option) if !option.choices.is_empty() => format!(
            "{:?} is not one of {}",
            value.string_form(),
            option.choices.join(", ")
        ),
        Some(option) => format!(
            "expected a {} value, found {} {:?}",
            option.option_type,
            value.type_name(),
            value.string_form()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::front_matter;
    use crate::io::store::MemoryStore;
    use pretty_assertions::assert_eq;

    async fn compile_with(
        store: &MemoryStore,
        policy: SchemaPolicy,
        metadata: &Metadata,
    ) -> CompiledMetadata {
        MetadataCompiler::new(store)
            .with_policy(policy)
            .compile(metadata, Path::new("/vault/notes"), Path::new("/vault"))
            .await
    }

    async fn compile(metadata: &Metadata) -> CompiledMetadata {
        compile_with(&MemoryStore::new(), SchemaPolicy::Warn, metadata).await
    }

    #[test]
    fn test_argument_display() {
        assert_eq!(Argument::flag("toc").to_string(), "--toc");
        assert_eq!(
            Argument::with_value("pdf-engine", "xelatex").to_string(),
            "--pdf-engine=xelatex"
        );
    }

    #[tokio::test]
    async fn test_boolean_flags() {
        let on = compile(&Metadata::new().with("pandoc-toc", true)).await;
        assert_eq!(on.to_args(), vec!["--toc"]);

        let off = compile(&Metadata::new().with("pandoc-toc", false)).await;
        assert!(off.to_args().is_empty());
        assert_eq!(off.argument_keys, vec!["pandoc-toc"]);

        let null = compile(&Metadata::new().with("pandoc-toc", MetaValue::Null)).await;
        assert!(null.to_args().is_empty());
    }

    #[tokio::test]
    async fn test_list_values_keep_order() {
        let metadata = Metadata::new().with("pandoc-filter", MetaValue::strings(["a", "b"]));
        let compiled = compile(&metadata).await;
        assert_eq!(compiled.to_args(), vec!["--filter=a", "--filter=b"]);
    }

    #[tokio::test]
    async fn test_list_skips_nulls_and_nested_values() {
        let metadata = Metadata::new().with(
            "pandoc-variable",
            MetaValue::List(vec![
                MetaValue::string("a=1"),
                MetaValue::Null,
                MetaValue::strings(["nested"]),
                MetaValue::string("b=2"),
            ]),
        );
        assert_eq!(
            compile(&metadata).await.to_args(),
            vec!["--variable=a=1", "--variable=b=2"]
        );
    }

    #[tokio::test]
    async fn test_scalars_and_order() {
        let metadata = Metadata::new()
            .with("title", "Report")
            .with("pandoc-toc-depth", 2i64)
            .with("author", "Ann")
            .with("pandoc-pdf-engine", "xelatex")
            .with("pandoc-number-sections", true);
        let compiled = compile(&metadata).await;

        assert_eq!(
            compiled.to_args(),
            vec!["--toc-depth=2", "--pdf-engine=xelatex", "--number-sections"]
        );
        let kept: Vec<_> = compiled.metadata.keys().collect();
        assert_eq!(kept, vec!["title", "author"]);
    }

    #[tokio::test]
    async fn test_partition_law() {
        let metadata = Metadata::new()
            .with("title", "T")
            .with("pandoc-toc", true)
            .with("pandoc-standalone", false)
            .with("pandoc-filter", MetaValue::strings(["x", "y", "z"]))
            .with("tags", MetaValue::strings(["a"]))
            .with("pandoc-nothing", MetaValue::Null);
        let compiled = compile(&metadata).await;

        assert_eq!(
            compiled.metadata.len() + compiled.argument_keys.len(),
            metadata.len()
        );
        for key in compiled.metadata.keys() {
            assert!(!key.starts_with(ARGUMENT_PREFIX));
            assert!(!compiled.argument_keys.iter().any(|k| k == key));
        }
        assert_eq!(compiled.arguments.len(), 4);
    }

    #[tokio::test]
    async fn test_nested_mapping_argument_is_skipped() {
        let nested: serde_yaml::Value = serde_yaml::from_str("a: 1").unwrap();
        let metadata = Metadata::new()
            .with("pandoc-metadata", MetaValue::Nested(nested.clone()))
            .with("extra", MetaValue::Nested(nested));
        let compiled = compile(&metadata).await;
        assert!(compiled.arguments.is_empty());
        assert!(compiled.metadata.contains_key("extra"));
    }

    #[tokio::test]
    async fn test_file_arguments_are_searched() {
        let store = MemoryStore::new()
            .with_document("/vault/templates/mystyle.tex", "")
            .with_document("/vault/notes/refs.bib", "");
        let metadata = Metadata::new()
            .with("pandoc-template", "mystyle.tex")
            .with("pandoc-bibliography", "refs.bib")
            .with("pandoc-csl", "missing.csl")
            .with("pandoc-title-prefix", "mystyle.tex");
        let compiled = compile_with(&store, SchemaPolicy::Warn, &metadata).await;

        assert_eq!(
            compiled.to_args(),
            vec![
                "--template=/vault/templates/mystyle.tex",
                "--bibliography=/vault/notes/refs.bib",
                "--csl=missing.csl",
                "--title-prefix=mystyle.tex",
            ]
        );
    }

    #[tokio::test]
    async fn test_file_list_elements_are_each_searched() {
        let store = MemoryStore::new().with_document("/vault/pandoc/wordcount.lua", "");
        let metadata = Metadata::new().with(
            "pandoc-lua-filter",
            MetaValue::strings(["wordcount.lua", "/abs/other.lua"]),
        );
        let compiled = compile_with(&store, SchemaPolicy::Warn, &metadata).await;
        assert_eq!(
            compiled.to_args(),
            vec![
                "--lua-filter=/vault/pandoc/wordcount.lua",
                "--lua-filter=/abs/other.lua"
            ]
        );
    }

    #[tokio::test]
    async fn test_policy_forward_and_warn_keep_invalid_arguments() {
        let metadata = Metadata::new()
            .with("pandoc-wrap", "sideways")
            .with("pandoc-not-a-real-option", true);
        for policy in [SchemaPolicy::Forward, SchemaPolicy::Warn] {
            let compiled = compile_with(&MemoryStore::new(), policy, &metadata).await;
            assert_eq!(
                compiled.to_args(),
                vec!["--wrap=sideways", "--not-a-real-option"]
            );
        }
    }

    #[tokio::test]
    async fn test_policy_drop_removes_invalid_arguments() {
        let metadata = Metadata::new()
            .with("pandoc-wrap", "sideways")
            .with("pandoc-not-a-real-option", true)
            .with("pandoc-toc", true)
            .with("pandoc-columns", MetaValue::strings(["72", "wide"]));
        let compiled = compile_with(&MemoryStore::new(), SchemaPolicy::Drop, &metadata).await;
        assert_eq!(compiled.to_args(), vec!["--toc", "--columns=72"]);
        assert_eq!(compiled.argument_keys.len(), 4);
    }

    #[test]
    fn test_violations() {
        let metadata = Metadata::new()
            .with("title", "ignored")
            .with("pandoc-wrap", "sideways")
            .with("pandoc-toc", "yes")
            .with("pandoc-citeproc", false)
            .with("pandoc-columns", MetaValue::strings(["72", "wide"]))
            .with("pandoc-not-a-real-option", true)
            .with("pandoc-number-sections", true);
        let found = violations(&metadata);

        let keys: Vec<_> = found.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "pandoc-wrap",
                "pandoc-toc",
                "pandoc-columns",
                "pandoc-not-a-real-option"
            ]
        );
        assert_eq!(
            found[0].to_string(),
            "pandoc-wrap: \"sideways\" is not one of auto, none, preserve"
        );
        assert_eq!(found[3].reason, "unknown option");
    }

    #[tokio::test]
    async fn test_integral_floats_render_as_integers() {
        let metadata = front_matter::parse_block("pandoc-dpi: 300.0\npandoc-toc-depth: 2\n");
        assert_eq!(
            compile(&metadata).await.to_args(),
            vec!["--dpi=300", "--toc-depth=2"]
        );
    }

    #[tokio::test]
    async fn test_empty_argument_name_is_ignored() {
        let compiled = compile(&Metadata::new().with("pandoc-", "x")).await;
        assert!(compiled.arguments.is_empty());
        assert_eq!(compiled.argument_keys, vec!["pandoc-"]);
    }

    #[tokio::test]
    async fn test_boolean_list_elements_render_as_text() {
        let metadata = Metadata::new().with(
            "pandoc-metadata",
            MetaValue::List(vec![MetaValue::Bool(true), MetaValue::int(3)]),
        );
        assert_eq!(
            compile(&metadata).await.to_args(),
            vec!["--metadata=true", "--metadata=3"]
        );
    }
}
