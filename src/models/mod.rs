//! Data models for the Tayyar site content backend.
//!
//! These models match the frontend TypeScript interfaces exactly, so the generated
//! content file can be imported by the site without translation.

mod content;
mod defaults;
mod publish;
mod session;

pub use content::*;
pub use publish::*;
pub use session::*;
