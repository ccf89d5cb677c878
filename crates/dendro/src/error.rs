//! Error types for the crate.

use thiserror::Error;

/// The errors that operations in this crate can return.
#[derive(Error, Debug)]
pub enum Error {
    /// The input to an operation is outside its domain, e.g. fewer than two
    /// observations or a distance array whose length is not triangular.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A linkage matrix, or a tree derived from one, is internally
    /// inconsistent.
    #[error("malformed linkage: {0}")]
    MalformedLinkage(String),

    /// A nested tree node has exactly one child. Nodes must have two children
    /// or be leaves with none.
    #[error("node {id} has exactly one child")]
    AsymmetricChild {
        /// The id of the offending node.
        id: usize,
    },

    /// An I/O error while reading or writing a linkage matrix.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A `Result` whose error type is [`enum@Error`].
pub type Result<T> = core::result::Result<T, Error>;
