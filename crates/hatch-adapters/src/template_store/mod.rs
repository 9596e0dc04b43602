//! Template store adapters.

mod filesystem;
mod memory;

pub use filesystem::{FRAGMENT_FILE, FilesystemTemplateStore, TREE_DIR};
pub use memory::InMemoryStore;
