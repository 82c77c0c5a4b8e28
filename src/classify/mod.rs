//! Workspace classification
//!
//! Inspects a cloned workspace and assigns a [`ProjectType`] plus a runtime
//! port, both driving recipe synthesis downstream.

mod detector;
mod project_type;

pub use detector::TypeClassifier;
pub use project_type::{ProjectType, RuntimeFamily};
