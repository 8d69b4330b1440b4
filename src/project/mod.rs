pub mod manifest;
pub mod project;

pub use manifest::{Manifest, ManifestFormat};
pub use project::*;
