//! Body rendering using Handlebars.
//!
//! The target repository has no notion of "originally posted by", so every
//! migrated issue and comment carries a rendered attribution header.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, strip_attribution, TemplateRenderer};
