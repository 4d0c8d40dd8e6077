//! Render backends for styling written source

mod terminal;
mod typst;

pub use terminal::Terminal;
pub use typst::Typst;
