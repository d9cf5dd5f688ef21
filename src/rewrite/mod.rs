//! Rewriting of version references in text
//!
//! This module provides:
//! - Collision-safe substitution of a version inside a matched reference
//! - The line rewriter that drives parsing, resolution and substitution

mod line;
mod substitute;

pub use line::{LineRewriter, TextRewrite};
pub use substitute::substitute;
