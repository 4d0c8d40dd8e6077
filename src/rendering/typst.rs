//! Typst markup for rendered source

use std::borrow::Cow;

use crate::formatting::*;

/// Add markup around syntactic elements for use when including rendered
/// source in Typst documents.
pub struct Typst;

impl Render for Typst {
    fn style(&self, syntax: Syntax, content: &str) -> String {
        let content = escape_typst(content);
        match syntax {
            Syntax::Neutral => markup("", &content),
            Syntax::Indent => markup("", &content),
            Syntax::Newline => "\\\n".to_string(),
            Syntax::Keyword => markup("fill: rgb(0x75, 0x50, 0x7b), weight: \"bold\"", &content),
            Syntax::Declaration => {
                markup("fill: rgb(0x34, 0x65, 0xa4), weight: \"bold\"", &content)
            }
            Syntax::Type => markup("fill: rgb(0x8f, 0x59, 0x02), weight: \"bold\"", &content),
            Syntax::Variable => markup("fill: rgb(0x72, 0x9f, 0xcf), weight: \"bold\"", &content),
            Syntax::Member => markup("fill: rgb(0x3b, 0x5d, 0x7d)", &content),
            Syntax::Function => markup("fill: rgb(0x34, 0x65, 0xa4)", &content),
            Syntax::Label => markup("fill: rgb(0x60, 0x98, 0x9a), weight: \"bold\"", &content),
            Syntax::String => markup("fill: rgb(0x4e, 0x9a, 0x06), weight: \"bold\"", &content),
            Syntax::Numeric => markup("fill: rgb(0xad, 0x7f, 0xa8), weight: \"bold\"", &content),
            Syntax::Operator => markup("fill: red", &content),
            Syntax::Structure => markup("fill: rgb(0x99, 0x99, 0x99), weight: \"bold\"", &content),
        }
    }
}

/// Content lands inside a Typst string literal, so backslashes and quotes
/// need escaping. Literals from the tree carry both.
fn escape_typst(content: &str) -> Cow<'_, str> {
    if content.contains('"') || content.contains('\\') {
        Cow::Owned(
            content
                .replace('\\', "\\\\")
                .replace('"', "\\\""),
        )
    } else {
        Cow::Borrowed(content)
    }
}

fn markup(prefix: &str, content: &str) -> String {
    let mut result = String::with_capacity(6 + prefix.len() + 2 + 5 + content.len() + 3);
    result.push_str("#text(");
    if !prefix.is_empty() {
        result.push_str(prefix);
        result.push_str(", ");
    }
    result.push_str("raw(\"");
    result.push_str(content);
    result.push_str("\"))");
    result
}
