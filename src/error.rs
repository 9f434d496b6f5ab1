use thiserror::Error;

/// Errors surfaced by tree operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested key is not present in the tree.
    ///
    /// A normal, recoverable input condition: deleting a key that was never
    /// inserted reports this and leaves the tree untouched.
    #[error("key not found in tree")]
    KeyNotFound,

    /// The structural search could not locate any node that should own the
    /// key's position.
    ///
    /// This never happens on a well-formed tree; it signals a violated
    /// fan-out invariant, so the tree should be considered corrupt.
    #[error("no node found for key position; tree invariant violated")]
    NodeNotFound,
}
