//! Export pipeline
//!
//! [`Exporter::prepare`] runs one document through the whole preparation:
//! front matter extraction, argument compilation, and embed flattening.
//! [`ConverterInvocation`] turns the result into a pandoc command line. The
//! command is only assembled here; running it is left to the caller.

use crate::config::ExportConfig;
use crate::core::compiler::{Argument, MetadataCompiler};
use crate::core::embed::{EmbedOutcome, EmbedResolver};
use crate::core::format::OutputFormat;
use crate::core::front_matter;
use crate::core::value::Metadata;
use crate::error::{PrepError, Result};
use crate::io::fs::{is_markdown, normalize_path, replace_extension};
use crate::io::link::LinkResolver;
use crate::io::store::DocumentStore;
use log::{debug, info};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// A document ready to hand to the converter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedExport {
    /// Flattened body, root front matter removed
    pub body: String,
    /// Root metadata without any `pandoc-` keys
    pub metadata: Metadata,
    /// Compiled converter arguments, in front matter order
    pub arguments: Vec<Argument>,
    /// What happened to each embed
    pub outcomes: Vec<EmbedOutcome>,
}

impl PreparedExport {
    /// The document to feed the converter: cleaned front matter over the body
    pub fn render(&self) -> Result<String> {
        front_matter::format(Some(&self.metadata), &self.body)
    }

    /// Arguments rendered as `--name` / `--name=value`
    pub fn args(&self) -> Vec<String> {
        self.arguments.iter().map(Argument::to_string).collect()
    }

    /// Embeds that could not be inlined
    pub fn failures(&self) -> impl Iterator<Item = &EmbedOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failure())
    }
}

/// Prepares documents from one vault
pub struct Exporter<'a> {
    store: &'a dyn DocumentStore,
    links: &'a dyn LinkResolver,
    config: &'a ExportConfig,
}

impl<'a> Exporter<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        links: &'a dyn LinkResolver,
        config: &'a ExportConfig,
    ) -> Self {
        Self {
            store,
            links,
            config,
        }
    }

    /// Read and prepare the document at `path`.
    ///
    /// Only Markdown documents can be exported. A missing document is
    /// reported as [`PrepError::DocumentNotFound`].
    pub async fn prepare(&self, path: &Path, root_dir: &Path) -> Result<PreparedExport> {
        if !is_markdown(path) {
            let extension = path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Err(PrepError::unknown_format(extension));
        }

        let text = self.store.read(path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PrepError::document_not_found(path),
            _ => PrepError::Io(e),
        })?;

        self.prepare_text(&text, path, root_dir).await
    }

    /// Prepare document text that has already been read from `path`
    pub async fn prepare_text(
        &self,
        text: &str,
        path: &Path,
        root_dir: &Path,
    ) -> Result<PreparedExport> {
        let path = normalize_path(path);
        let path = path.as_path();
        let current_dir = path.parent().unwrap_or(root_dir);

        let metadata = front_matter::extract(text);
        let compiled = MetadataCompiler::new(self.store)
            .with_search(self.config.path_search())
            .with_policy(self.config.schema_policy)
            .compile(&metadata, current_dir, root_dir)
            .await;

        let body = front_matter::strip(text);
        let flattened = EmbedResolver::new(self.links, self.store)
            .resolve_document(&body, path)
            .await;

        info!(
            "Prepared {}: {} arguments, {} embeds",
            path.display(),
            compiled.arguments.len(),
            flattened.outcomes.len()
        );

        Ok(PreparedExport {
            body: flattened.text,
            metadata: compiled.metadata,
            arguments: compiled.arguments,
            outcomes: flattened.outcomes,
        })
    }
}

/// A fully assembled converter command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Directory the converter should run in, so relative resources resolve
    pub working_dir: PathBuf,
    pub output: PathBuf,
}

impl ConverterInvocation {
    /// Assemble the command converting `input` (the prepared file) for the
    /// document at `document_path`.
    pub fn build(
        config: &ExportConfig,
        format: &OutputFormat,
        input: &Path,
        document_path: &Path,
        root_dir: &Path,
        arguments: &[Argument],
    ) -> Self {
        let output = output_path(config, format, document_path, root_dir);
        let working_dir = document_path.parent().unwrap_or(root_dir).to_path_buf();

        let mut args = vec![
            input.to_string_lossy().into_owned(),
            "--from=markdown".to_string(),
        ];
        if let Some(writer) = format.writer {
            args.push(format!("--to={writer}"));
        }
        args.push(format!("--output={}", output.display()));
        args.extend(arguments.iter().map(Argument::to_string));

        if format.needs_latex && !arguments.iter().any(|a| a.name == "pdf-engine") {
            if let Some(engine) = &config.pdflatex {
                args.push(format!("--pdf-engine={}", engine.display()));
            }
        }
        args.extend(config.extra_argument_list());

        debug!("Converter arguments: {:?}", args);
        Self {
            program: config.pandoc.clone(),
            args,
            working_dir,
            output,
        }
    }
}

impl fmt::Display for ConverterInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Output file for a document, honouring the configured output folder
fn output_path(
    config: &ExportConfig,
    format: &OutputFormat,
    document_path: &Path,
    root_dir: &Path,
) -> PathBuf {
    let output = replace_extension(document_path, format.extension);
    match (&config.output_folder, output.file_name()) {
        (Some(folder), Some(name)) => {
            let folder = if folder.is_absolute() {
                folder.clone()
            } else {
                root_dir.join(folder)
            };
            folder.join(name)
        }
        _ => output,
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=./:,@+%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compiler::SchemaPolicy;
    use crate::io::link::VaultLinkResolver;
    use crate::io::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn vault(documents: &[(&str, &str)]) -> (MemoryStore, VaultLinkResolver) {
        let mut store = MemoryStore::new();
        for (path, content) in documents {
            store.insert(*path, *content);
        }
        let links = VaultLinkResolver::from_files("/vault", documents.iter().map(|(p, _)| *p));
        (store, links)
    }

    #[tokio::test]
    async fn test_prepare_end_to_end() {
        let (store, links) = vault(&[
            (
                "/vault/report.md",
                "---\ntitle: Report\npandoc-toc: true\npandoc-template: mystyle.tex\n---\n\n# Intro\n\n![[part]]\n",
            ),
            ("/vault/part.md", "---\npandoc-toc: false\nauthor: Nobody\n---\nPart body"),
            ("/vault/templates/mystyle.tex", "$body$"),
        ]);
        let config = ExportConfig::default();
        let exporter = Exporter::new(&store, &links, &config);

        let prepared = exporter
            .prepare(Path::new("/vault/report.md"), Path::new("/vault"))
            .await
            .unwrap();

        assert_eq!(prepared.body, "# Intro\n\nPart body");
        assert_eq!(
            prepared.args(),
            vec!["--toc", "--template=/vault/templates/mystyle.tex"]
        );
        let keys: Vec<_> = prepared.metadata.keys().collect();
        assert_eq!(keys, vec!["title"]);
        assert_eq!(
            prepared.render().unwrap(),
            "---\ntitle: Report\n---\n\n# Intro\n\nPart body"
        );
        assert_eq!(prepared.failures().count(), 0);
    }

    #[tokio::test]
    async fn test_render_without_metadata_is_body_only() {
        let (store, links) = vault(&[("/vault/a.md", "---\npandoc-toc: true\n---\nBody")]);
        let config = ExportConfig::default();
        let prepared = Exporter::new(&store, &links, &config)
            .prepare(Path::new("/vault/a.md"), Path::new("/vault"))
            .await
            .unwrap();
        assert_eq!(prepared.render().unwrap(), "Body");
    }

    #[tokio::test]
    async fn test_prepare_rejects_non_markdown() {
        let (store, links) = vault(&[("/vault/a.txt", "text")]);
        let config = ExportConfig::default();
        let err = Exporter::new(&store, &links, &config)
            .prepare(Path::new("/vault/a.txt"), Path::new("/vault"))
            .await
            .unwrap_err();
        assert!(matches!(err, PrepError::UnknownFormat { format } if format == "txt"));
    }

    #[tokio::test]
    async fn test_prepare_missing_document() {
        let (store, links) = vault(&[]);
        let config = ExportConfig::default();
        let err = Exporter::new(&store, &links, &config)
            .prepare(Path::new("/vault/none.md"), Path::new("/vault"))
            .await
            .unwrap_err();
        assert!(matches!(err, PrepError::DocumentNotFound { .. }));
    }

    #[tokio::test]
    async fn test_prepare_applies_schema_policy() {
        let (store, links) = vault(&[(
            "/vault/a.md",
            "---\npandoc-wrap: sideways\npandoc-toc: true\n---\nBody",
        )]);
        let config = ExportConfig {
            schema_policy: SchemaPolicy::Drop,
            ..ExportConfig::default()
        };
        let prepared = Exporter::new(&store, &links, &config)
            .prepare(Path::new("/vault/a.md"), Path::new("/vault"))
            .await
            .unwrap();
        assert_eq!(prepared.args(), vec!["--toc"]);
    }

    #[test]
    fn test_invocation_layout() {
        let config = ExportConfig {
            extra_arguments: "--standalone\n\n  --embed-resources \n".to_string(),
            ..ExportConfig::default()
        };
        let format = OutputFormat::lookup("html").unwrap();
        let invocation = ConverterInvocation::build(
            &config,
            format,
            Path::new("/tmp/prepared.md"),
            Path::new("/vault/notes/report.md"),
            Path::new("/vault"),
            &[Argument::flag("toc"), Argument::with_value("toc-depth", "2")],
        );

        assert_eq!(invocation.program, PathBuf::from("pandoc"));
        assert_eq!(invocation.working_dir, PathBuf::from("/vault/notes"));
        assert_eq!(invocation.output, PathBuf::from("/vault/notes/report.html"));
        assert_eq!(
            invocation.args,
            vec![
                "/tmp/prepared.md",
                "--from=markdown",
                "--to=html",
                "--output=/vault/notes/report.html",
                "--toc",
                "--toc-depth=2",
                "--standalone",
                "--embed-resources",
            ]
        );
    }

    #[test]
    fn test_invocation_pdf_and_output_folder() {
        let config = ExportConfig {
            output_folder: Some(PathBuf::from("exports")),
            pdflatex: Some(PathBuf::from("/usr/bin/xelatex")),
            ..ExportConfig::default()
        };
        let format = OutputFormat::lookup("pdf").unwrap();
        let invocation = ConverterInvocation::build(
            &config,
            format,
            Path::new("/tmp/prepared.md"),
            Path::new("/vault/notes/report.md"),
            Path::new("/vault"),
            &[],
        );
        assert_eq!(
            invocation.args,
            vec![
                "/tmp/prepared.md",
                "--from=markdown",
                "--output=/vault/exports/report.pdf",
                "--pdf-engine=/usr/bin/xelatex",
            ]
        );

        let explicit = ConverterInvocation::build(
            &config,
            format,
            Path::new("/tmp/prepared.md"),
            Path::new("/vault/notes/report.md"),
            Path::new("/vault"),
            &[Argument::with_value("pdf-engine", "lualatex")],
        );
        assert_eq!(explicit.args.last().unwrap(), "--pdf-engine=lualatex");
    }

    #[test]
    fn test_invocation_display_quotes() {
        let invocation = ConverterInvocation {
            program: PathBuf::from("pandoc"),
            args: vec![
                "/vault/My Notes/a.md".to_string(),
                "--metadata=title:It's".to_string(),
                "--toc".to_string(),
            ],
            working_dir: PathBuf::from("/vault"),
            output: PathBuf::from("/vault/a.html"),
        };
        assert_eq!(
            invocation.to_string(),
            r"pandoc '/vault/My Notes/a.md' '--metadata=title:It'\''s' --toc"
        );
    }
}
