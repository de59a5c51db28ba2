pub mod fs;
pub mod link;
pub mod search;
pub mod store;

pub use fs::{find_vault_root, is_markdown, resolve_files, write_atomic, write_temporary};
pub use link::{LinkResolver, VaultConfig, VaultLinkResolver};
pub use search::{PathSearch, DEFAULT_SEARCH_DIRS};
pub use store::{DocumentStore, FsStore, MemoryStore};
