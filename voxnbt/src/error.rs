//! Contains the Error and Result type used by the reader and decoder.

/// An error produced while decoding a tag tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A read went past the end of the input. The format has no other way of
    /// signalling truncation, so this also covers a compound missing its End
    /// tag.
    OutOfBounds,

    /// A tag byte outside of the known range, or a list that claims to
    /// contain End tags.
    InvalidTag,

    /// A string was not valid (modified) UTF-8.
    InvalidString,

    /// Compounds and lists were nested deeper than the configured limit.
    TooDeep,

    /// Any other errors. Users should not match on this variant and should
    /// instead use a wildcard `_`. Errors in this category may be moved to new
    /// variants.
    Other,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// True if the error means the input ended early.
    pub fn is_eof(&self) -> bool {
        self.kind == ErrorKind::OutOfBounds
    }

    pub(crate) fn out_of_bounds(wanted: usize, remaining: usize) -> Self {
        Self {
            msg: format!(
                "eof: wanted {} bytes but only {} remain",
                wanted, remaining
            ),
            kind: ErrorKind::OutOfBounds,
        }
    }

    pub(crate) fn invalid_tag(tag: u8) -> Self {
        Self {
            msg: format!("invalid nbt tag value: {}", tag),
            kind: ErrorKind::InvalidTag,
        }
    }

    pub(crate) fn end_list(len: i32) -> Self {
        Self {
            msg: format!("list of End tags with length {}", len),
            kind: ErrorKind::InvalidTag,
        }
    }

    pub(crate) fn nonunicode_string(data: &[u8]) -> Self {
        Self {
            msg: format!(
                "invalid nbt string: nonunicode: {}",
                String::from_utf8_lossy(data)
            ),
            kind: ErrorKind::InvalidString,
        }
    }

    pub(crate) fn too_deep(limit: usize) -> Self {
        Self {
            msg: format!("nbt nested deeper than limit of {}", limit),
            kind: ErrorKind::TooDeep,
        }
    }

    pub(crate) fn bespoke(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind: ErrorKind::Other,
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}
