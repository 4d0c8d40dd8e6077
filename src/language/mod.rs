// Types representing expression trees and the metadata they refer to

mod derived;
mod error;
mod factory;
mod nodes;
pub mod rewrite;
mod types;
mod values;

// Re-export all public symbols
pub use derived::*;
pub use error::*;
pub use nodes::*;
pub use types::*;
pub use values::*;
