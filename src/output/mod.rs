//! Wrapping rendered source into complete output documents

use serde::Serialize;
use thiserror::Error;
use tinytemplate::TinyTemplate;
use tracing::debug;

static TEMPLATE: &str = r#"#set page(width: auto, height: auto, margin: 1cm)
#show raw: set text(font: "Inconsolata")

= {title}

{markup}
"#;

#[derive(Serialize)]
struct Context<'a> {
    title: &'a str,
    markup: &'a str,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("unable to fill document template: {0}")]
    Template(#[from] tinytemplate::error::Error),
}

/// Wrap source already styled by the Typst renderer into a standalone
/// document.
pub fn typst_document(title: &str, markup: &str) -> Result<String, OutputError> {
    debug!(title, "Building Typst document");

    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template("document", TEMPLATE)?;

    let context = Context { title, markup };

    Ok(tt.render("document", &context)?)
}
