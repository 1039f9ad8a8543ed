pub mod entities;
pub mod records;

// Re-export tracing for use in this crate
pub use tracing;
