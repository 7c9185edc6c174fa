//! Domain layer for Model Guardian
//!
//! Architecture: Domain Model - Pure vocabulary of validation findings
//! - Diagnostics, severities and the rule catalog
//! - Independent of how models are loaded or how reports are rendered

pub mod diagnostics;
pub mod rules;

// Re-export main domain types for convenience
pub use diagnostics::*;
pub use rules::Rule;
