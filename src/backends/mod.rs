//! Reference backend implementations

#[cfg(feature = "console")]
pub mod console;
pub mod json;

#[cfg(feature = "console")]
pub use console::ConsoleBackend;
pub use json::JsonBackend;

// Re-export the trait for convenience
pub use crate::core::Backend;
