//! User directory backends (stand-ins for the host identity system).

pub mod in_memory;

pub use in_memory::InMemoryUserDirectory;
