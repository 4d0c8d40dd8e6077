//! Two-pass rendering of trees to styled text

use tracing::debug;

use crate::formatting::*;
use crate::language::{Expression, Lambda};

/// We do the code formatting in two passes. First we write the tree into a
/// Vec of "fragments" (Syntax tag, String pairs). Then second we apply the
/// specified renderer to each pair to result in an
/// embellished/highlighted/marked-up String. An error in the first pass
/// discards everything written so far.
pub fn render(renderer: &impl Render, lambda: &Lambda) -> Result<String, RenderError> {
    // Pass 1: Write tree to tagged fragments
    let mut output = TextFormatter::new();
    Writer::new(&mut output).write_lambda(lambda)?;

    // Pass 2: Render tagged fragments to final output
    Ok(render_to_string(renderer, output.into_fragments()))
}

/// Render a single expression rather than a whole lambda.
pub fn render_expression(
    renderer: &impl Render,
    expression: &Expression,
) -> Result<String, RenderError> {
    let mut output = TextFormatter::new();
    Writer::new(&mut output).write(expression)?;

    Ok(render_to_string(renderer, output.into_fragments()))
}

/// Plain source text of a lambda.
pub fn to_code(lambda: &Lambda) -> Result<String, RenderError> {
    render(&Identity, lambda)
}

/// Pass 2: apply markup to fragments via style() and combine.
pub fn render_to_string(renderer: &impl Render, fragments: Vec<(Syntax, String)>) -> String {
    debug!(fragments = fragments.len(), "Rendering");

    let mut output = String::new();

    for (syntax, content) in fragments {
        let rendered = renderer.style(syntax, &content);
        output.push_str(&rendered);
    }

    output
}
