//! The output sink the writer emits source text through

use std::fmt;

use crate::formatting::Syntax;
use crate::language::{Lambda, LabelTarget, Member, Method, Parameter, Type};

/// What an identifier or reference written to a [`Formatter`] stands for.
#[derive(Debug, Clone, Copy)]
pub enum Referent<'a> {
    Type(&'a Type),
    Method(&'a Method),
    Member(&'a Member),
    Parameter(&'a Parameter),
    Label(&'a LabelTarget),
    Lambda(&'a Lambda),
}

/// Primitive write operations. Implementations track indentation, which
/// is applied at the first write on each line.
pub trait Formatter {
    fn write(&mut self, text: &str);
    fn newline(&mut self);
    fn space(&mut self);
    fn token(&mut self, token: &str);
    fn keyword(&mut self, keyword: &str);
    fn literal(&mut self, literal: &str);
    fn reference(&mut self, value: &str, referent: Referent<'_>);
    fn identifier(&mut self, value: &str, referent: Referent<'_>);
    fn indent(&mut self);
    fn dedent(&mut self);
}

/// Collects tagged fragments, ready to be styled by a renderer.
pub struct TextFormatter {
    pub fragments: Vec<(Syntax, String)>,
    nesting: usize,
    unit: String,
    pending: bool,
}

impl TextFormatter {
    pub fn new() -> TextFormatter {
        TextFormatter::with_indent("\t")
    }

    pub fn with_indent(unit: &str) -> TextFormatter {
        TextFormatter {
            fragments: Vec::new(),
            nesting: 0,
            unit: unit.to_string(),
            pending: true,
        }
    }

    fn append(&mut self, syntax: Syntax, content: &str) {
        if content.is_empty() {
            return;
        }
        if self.pending {
            self.pending = false;
            if self.nesting > 0 {
                let indent = self
                    .unit
                    .repeat(self.nesting);
                self.fragments
                    .push((Syntax::Indent, indent));
            }
        }
        self.fragments
            .push((syntax, content.to_string()));
    }

    pub fn into_fragments(self) -> Vec<(Syntax, String)> {
        self.fragments
    }
}

impl Default for TextFormatter {
    fn default() -> TextFormatter {
        TextFormatter::new()
    }
}

fn token_syntax(token: &str) -> Syntax {
    match token {
        "{" | "}" | "(" | ")" | "[" | "]" | ";" | "," | "." | ":" => Syntax::Structure,
        _ => Syntax::Operator,
    }
}

fn literal_syntax(literal: &str) -> Syntax {
    match literal {
        "null" | "true" | "false" => Syntax::Keyword,
        _ if literal.starts_with('"') || literal.starts_with('\'') => Syntax::String,
        _ => Syntax::Numeric,
    }
}

fn referent_syntax(referent: Referent<'_>) -> Syntax {
    match referent {
        Referent::Type(_) => Syntax::Type,
        Referent::Method(_) => Syntax::Function,
        Referent::Member(_) => Syntax::Member,
        Referent::Parameter(_) => Syntax::Variable,
        Referent::Label(_) => Syntax::Label,
        Referent::Lambda(_) => Syntax::Declaration,
    }
}

impl Formatter for TextFormatter {
    fn write(&mut self, text: &str) {
        self.append(Syntax::Neutral, text);
    }

    fn newline(&mut self) {
        self.fragments
            .push((Syntax::Newline, "\n".to_string()));
        self.pending = true;
    }

    fn space(&mut self) {
        self.append(Syntax::Neutral, " ");
    }

    fn token(&mut self, token: &str) {
        self.append(token_syntax(token), token);
    }

    fn keyword(&mut self, keyword: &str) {
        self.append(Syntax::Keyword, keyword);
    }

    fn literal(&mut self, literal: &str) {
        self.append(literal_syntax(literal), literal);
    }

    fn reference(&mut self, value: &str, referent: Referent<'_>) {
        self.append(referent_syntax(referent), value);
    }

    fn identifier(&mut self, value: &str, referent: Referent<'_>) {
        self.append(referent_syntax(referent), value);
    }

    fn indent(&mut self) {
        self.nesting += 1;
    }

    fn dedent(&mut self) {
        self.nesting = self
            .nesting
            .saturating_sub(1);
    }
}

impl fmt::Display for TextFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, content) in &self.fragments {
            f.write_str(content)?;
        }
        Ok(())
    }
}
