use thiserror::Error;

/// Errors that occur while reading a bracketed tree.
///
/// Offsets are byte offsets into the string that was parsed.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MalformedTreeError {
    /// The input does not contain any brackets or labels.
    #[error("empty tree description")]
    EmptyInput,

    /// A closing bracket without a matching opening bracket.
    #[error("unbalanced closing bracket at offset {offset}")]
    UnbalancedClose { offset: usize },

    /// The input ended while brackets were still open.
    #[error("input ended with {open} unclosed bracket(s)")]
    Unclosed { open: usize },

    /// A second tree was opened after the root was closed.
    #[error("second root node opened at offset {offset}")]
    MultipleRoots { offset: usize },

    /// A label that is not enclosed by any brackets.
    #[error("label '{label}' outside of brackets at offset {offset}")]
    LabelOutsideBrackets { label: String, offset: usize },

    /// The input ended directly after a label.
    #[error("input ended after label '{label}'")]
    UnexpectedEnd { label: String },

    /// A non-terminal below the root without a label.
    #[error("non-terminal without a label at offset {offset}")]
    MissingLabel { offset: usize },

    /// A second label for a node that already has one.
    #[error("node already labeled, found label '{label}' at offset {offset}")]
    DuplicateLabel { label: String, offset: usize },

    /// The parsed tree does not reproduce the normalized input.
    #[error("tree does not round-trip, expected '{expected}', found '{found}'")]
    RoundTrip { expected: String, found: String },
}
