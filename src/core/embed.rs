//! Embed resolution
//!
//! Inlines `![[note]]` and `![[note|alias]]` references recursively. Each
//! embedded note loses its front matter before it is inlined, so only the
//! root document's metadata ever reaches the compiler.
//!
//! Cycles are broken with a [`ResolutionChain`]: the paths currently being
//! expanded, root first. A reference to a path already on the chain becomes a
//! plain Markdown link instead of being expanded again. Each recursive call
//! receives its own extended copy of the chain, so siblings never see each
//! other's entries.

use crate::core::front_matter;
use crate::io::fs::normalize_path;
use crate::io::link::LinkResolver;
use crate::io::store::DocumentStore;
use log::{debug, warn};
use regex::Regex;
use std::future::Future;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::LazyLock;

/// Boxed future used for the recursive expansion
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// `![[name]]` or `![[name|alias]]`; the name may contain neither `]` nor `|`
static EMBED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[\[([^\]|]+)(\|[^\]]+)?\]\]").expect("embed pattern is a valid regex")
});

/// A single embed found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReference {
    /// Byte range of the whole `![[...]]` in the source text
    pub span: Range<usize>,
    /// Link target, trimmed
    pub target: String,
    /// Display alias, if any
    pub alias: Option<String>,
}

/// Find every embed reference in a text, in order of occurrence
pub fn find_embeds(text: &str) -> Vec<EmbedReference> {
    EMBED_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(EmbedReference {
                span: whole.range(),
                target: caps.get(1)?.as_str().trim().to_string(),
                alias: caps
                    .get(2)
                    .map(|alias| alias.as_str().trim_start_matches('|').to_string()),
            })
        })
        .collect()
}

/// The documents currently being expanded, root first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionChain(Vec<PathBuf>);

impl ResolutionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain holding only the root document
    pub fn rooted(path: impl Into<PathBuf>) -> Self {
        Self(vec![path.into()])
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.0.iter().any(|p| p == path)
    }

    /// A copy of this chain with one more document appended
    pub fn extended(&self, path: &Path) -> Self {
        let mut paths = self.0.clone();
        paths.push(path.to_path_buf());
        Self(paths)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }
}

/// What happened to one embed reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedOutcome {
    /// Content was read and inlined
    Inlined { target: String, path: PathBuf },
    /// Target was already being expanded; rendered as a link
    Cyclic { target: String, path: PathBuf },
    /// No document matched the link; left as written
    Unresolved { target: String },
    /// The document could not be read; left as written
    ReadFailed {
        target: String,
        path: PathBuf,
        reason: String,
    },
}

impl EmbedOutcome {
    pub fn target(&self) -> &str {
        match self {
            Self::Inlined { target, .. }
            | Self::Cyclic { target, .. }
            | Self::Unresolved { target }
            | Self::ReadFailed { target, .. } => target,
        }
    }

    /// Whether the embed was left in its original syntax
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Unresolved { .. } | Self::ReadFailed { .. })
    }
}

/// Result of flattening a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattened {
    pub text: String,
    /// Every embed encountered, depth first in document order
    pub outcomes: Vec<EmbedOutcome>,
}

/// Recursive embed resolver
pub struct EmbedResolver<'a> {
    links: &'a dyn LinkResolver,
    store: &'a dyn DocumentStore,
}

impl<'a> EmbedResolver<'a> {
    pub fn new(links: &'a dyn LinkResolver, store: &'a dyn DocumentStore) -> Self {
        Self { links, store }
    }

    /// Flatten a root document. The root itself is placed on the chain, so a
    /// note that embeds itself (directly or through others) ends in a link.
    /// The path is normalized first, matching what link resolvers return.
    pub async fn resolve_document(&self, text: &str, document_path: &Path) -> Flattened {
        let root = normalize_path(document_path);
        self.resolve(text, &root, ResolutionChain::rooted(root.clone()))
            .await
    }

    /// Replace every embed in `text` with the flattened content of its target.
    ///
    /// `document_path` is the path of the document `text` came from; links are
    /// resolved against its directory. `chain` holds the documents already
    /// being expanded.
    pub fn resolve<'b>(
        &'b self,
        text: &'b str,
        document_path: &'b Path,
        chain: ResolutionChain,
    ) -> BoxFuture<'b, Flattened> {
        Box::pin(async move {
            let embeds = find_embeds(text);
            if embeds.is_empty() {
                return Flattened {
                    text: text.to_string(),
                    outcomes: Vec::new(),
                };
            }

            let scope_dir = document_path.parent().unwrap_or_else(|| Path::new(""));
            let mut output = String::with_capacity(text.len());
            let mut outcomes = Vec::with_capacity(embeds.len());
            let mut last = 0;

            for embed in embeds {
                output.push_str(&text[last..embed.span.start]);
                let literal = &text[embed.span.clone()];
                let replacement = self
                    .expand(&embed.target, literal, scope_dir, &chain, &mut outcomes)
                    .await;
                output.push_str(&replacement);
                last = embed.span.end;
            }
            output.push_str(&text[last..]);

            Flattened {
                text: output,
                outcomes,
            }
        })
    }

    async fn expand(
        &self,
        target: &str,
        literal: &str,
        scope_dir: &Path,
        chain: &ResolutionChain,
        outcomes: &mut Vec<EmbedOutcome>,
    ) -> String {
        let Some(path) = self.links.resolve_link(target, scope_dir) else {
            warn!("Could not resolve embedded file: {}", target);
            outcomes.push(EmbedOutcome::Unresolved {
                target: target.to_string(),
            });
            return literal.to_string();
        };

        if chain.contains(&path) {
            debug!(
                "Embed cycle on {} ({}), rendering a link",
                target,
                path.display()
            );
            outcomes.push(EmbedOutcome::Cyclic {
                target: target.to_string(),
                path,
            });
            return format!("[{target}]({target})");
        }

        let raw = match self.store.read(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Error reading embedded file {}: {}", path.display(), e);
                outcomes.push(EmbedOutcome::ReadFailed {
                    target: target.to_string(),
                    path,
                    reason: e.to_string(),
                });
                return literal.to_string();
            }
        };

        debug!("Inlining {} (depth {})", path.display(), chain.len());
        let body = front_matter::strip(&raw);
        let nested_chain = chain.extended(&path);
        outcomes.push(EmbedOutcome::Inlined {
            target: target.to_string(),
            path: path.clone(),
        });

        let nested = self.resolve(&body, &path, nested_chain).await;
        outcomes.extend(nested.outcomes);
        nested.text
    }
}
