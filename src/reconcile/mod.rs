//! Reconciliation of the URL index against the notes tree

mod engine;
mod settings;

pub use engine::{Outcome, Reconciler, Resolution, ResolveError};
pub use settings::{Settings, TemplateSpec};
