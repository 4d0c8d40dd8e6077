//! Writing expression trees as source text

mod error;
mod formatter;
pub mod precedence;
mod renderer;
mod syntax;
mod writer;

// Re-export all public symbols
pub use error::*;
pub use formatter::*;
pub use renderer::*;
pub use syntax::*;
pub use writer::*;
