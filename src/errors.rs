use thiserror::Error;

/// Syntax problems found in a raw format string. Positions are byte offsets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("block opened at {pos} inside another block")]
    NestedBlock { pos: usize },

    #[error("'}}' at {pos} closes no block")]
    UnmatchedClose { pos: usize },

    #[error("block is never closed")]
    UnclosedBlock,

    #[error("unknown tag '%{name}' at {pos}")]
    UnknownTag { name: String, pos: usize },
}

/// Reasons a format cannot produce a usable path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid format: {0}")]
    Structural(#[from] StructuralError),

    /// Nothing usable was left after every fallback.
    #[error("format produced an empty path")]
    EmptyResult,

    /// The directory part of the path is empty, e.g. `/name`.
    #[error("format produced a malformed path: {0}")]
    MalformedPath(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = FormatError::from(StructuralError::UnknownTag { name: "foo".into(), pos: 3 });
        assert_eq!(e.to_string(), "invalid format: unknown tag '%foo' at 3");
        assert_eq!(StructuralError::UnmatchedClose { pos: 0 }.to_string(), "'}' at 0 closes no block");
        assert_eq!(FormatError::MalformedPath("/x".into()).to_string(), "format produced a malformed path: /x");
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FormatError>();
    }
}
