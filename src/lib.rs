pub mod combinators;
pub mod evaluation;
pub mod formatting;
pub mod language;
pub mod output;
pub mod reduction;
pub mod rendering;
pub mod samples;
