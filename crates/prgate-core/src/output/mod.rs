//! Output formatting and GitHub Actions integration

pub mod gha;
pub mod json_format;

pub use gha::{error_annotation, GhaOutput};
