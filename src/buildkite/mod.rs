pub mod client;
pub mod types;

pub use client::{BuildkiteClient, DEFAULT_BASE_URL};
pub use types::{Build, Job};
