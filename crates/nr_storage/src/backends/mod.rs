pub mod memory;

pub use memory::{MemoryConfig, MemoryImageStore};
