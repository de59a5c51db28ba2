//! Document transformations: front matter, embeds, argument compilation and
//! the pandoc option schema

pub mod compiler;
pub mod embed;
pub mod format;
pub mod front_matter;
pub mod schema;
pub mod value;

pub use compiler::{
    violations, Argument, CompiledMetadata, MetadataCompiler, SchemaPolicy, Violation,
    ARGUMENT_PREFIX, FILE_PATH_ARGUMENTS,
};
pub use embed::{EmbedOutcome, EmbedReference, EmbedResolver, Flattened, ResolutionChain};
pub use format::{OutputFormat, OUTPUT_FORMATS};
pub use schema::{OptionSchema, OptionType, PANDOC_OPTIONS};
pub use value::{MetaValue, Metadata, Scalar};
