// Program wide top-level error handling

use owo_colors::OwoColorize;
use thiserror::Error;

use exprwriter::combinators::CombineError;
use exprwriter::evaluation::EvaluationError;
use exprwriter::formatting::RenderError;
use exprwriter::language::ConstructionError;
use exprwriter::output::OutputError;

/// Everything that can go wrong between picking a sample and printing it.
#[derive(Debug, Error)]
pub enum Problem {
    #[error("no sample named {0}; try 'exprfmt list'")]
    UnknownSample(String),

    #[error("could not build the tree: {0}")]
    Build(#[from] CombineError),

    #[error("could not reduce the tree: {0}")]
    Reduce(#[from] ConstructionError),

    #[error("could not write the tree: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("invalid argument {0}")]
    Argument(String),

    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
}

/// Format a problem as a single line for the terminal.
pub fn concise_problem(sample: &str, problem: &Problem) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        sample,
        problem
            .to_string()
            .bold()
    )
}
