use thiserror::Error;

use crate::language::Kind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("cannot write {kind:?}: {reason}")]
    Unsupported { kind: Kind, reason: &'static str },
}
