//! pandoc-prep: prepare Obsidian notes for pandoc
//!
//! A note is turned into something pandoc can consume in three steps:
//!
//! - `![[embed]]` references are inlined recursively, with cycles rendered as
//!   plain links and embedded front matter dropped
//! - front matter keys prefixed with `pandoc-` are compiled into ordered
//!   `--name[=value]` arguments, with file-valued arguments searched for in
//!   the vault
//! - the remaining metadata is written back above the flattened body
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pandoc_prep::{ExportConfig, Exporter, FsStore, Result, VaultLinkResolver};
//! use std::path::Path;
//!
//! # async fn run() -> Result<()> {
//! let root = Path::new("/home/me/vault");
//! let links = VaultLinkResolver::scan(root)?;
//! let config = ExportConfig::default();
//! let exporter = Exporter::new(&FsStore, &links, &config);
//!
//! let prepared = exporter.prepare(&root.join("report.md"), root).await?;
//! println!("{}", prepared.args().join(" "));
//! println!("{}", prepared.render()?);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: embed resolution, metadata compilation, the option schema
//! - [`io`]: document stores, link resolution, file search
//! - [`export`]: the end-to-end pipeline and converter command assembly
//! - [`config`]: export settings
//! - [`error`]: error types

pub use config::ExportConfig;
pub use error::{ErrorSeverity, PrepError, Result};
pub use export::{ConverterInvocation, Exporter, PreparedExport};

pub use core::{
    Argument, CompiledMetadata, EmbedOutcome, EmbedResolver, MetaValue, Metadata,
    MetadataCompiler, OptionSchema, OptionType, OutputFormat, SchemaPolicy,
};
pub use io::{DocumentStore, FsStore, LinkResolver, MemoryStore, PathSearch, VaultLinkResolver};

pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod io;
