/// In-memory catalog provider
pub mod memory;

pub use memory::MemoryCatalog;
