//! Running expression trees.
//!
//! The interpreter walks a tree after lowering its derived nodes, so loops
//! and `using` blocks run exactly as their reductions say they do. Host
//! code supplies objects through [`Object`](crate::language::Object) and
//! static functions through [`Interpreter::define`].

mod arithmetic;
mod error;
mod interpreter;

pub use error::EvaluationError;
pub use interpreter::{Function, Instance, Interpreter};
