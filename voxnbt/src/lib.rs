//! voxnbt decodes the named binary tag (NBT) trees that voxel world saves use
//! for chunk payloads. It is read-only: there is no serializer.
//!
//! * For the byte-level cursor see [`input::Reader`].
//! * For the decoder entry points see [`de`].
//! * For the owned tree type see [`Value`].
//!
//! # Quick example
//!
//! ```no_run
//! use voxnbt::{from_bytes, Value};
//!
//! # fn main() -> voxnbt::error::Result<()> {
//! let data: Vec<u8> = std::fs::read("chunk.nbt").unwrap();
//! let root = from_bytes(&data)?;
//!
//! if let Some(Value::Int(version)) = root.get("DataVersion") {
//!     println!("data version {}", version);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Depth limit
//!
//! Compounds and lists can nest arbitrarily deep in the binary format. The
//! decoder counts nesting explicitly and fails with
//! [`ErrorKind::TooDeep`][error::ErrorKind::TooDeep] once [`DeOpts::max_depth`]
//! is exceeded.

pub mod de;
pub mod error;
pub mod input;

mod value;

pub use de::{from_bytes, from_bytes_named, from_bytes_with_opts};
pub use value::*;

#[cfg(any(test, feature = "test-util"))]
#[doc(hidden)]
pub mod test_util;

#[cfg(test)]
mod test;

use std::convert::TryFrom;

/// An NBT tag. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all of the same tag.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

/// Options for decoding a tag tree.
///
/// ```
/// use voxnbt::DeOpts;
/// let opts = DeOpts::new().max_depth(64);
/// assert_eq!(opts.depth_limit(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeOpts {
    max_depth: usize,
}

impl DeOpts {
    /// Default maximum nesting of compounds and lists. Matches the limit the
    /// game itself applies when reading trees.
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Maximum number of nested compounds and lists. The root compound counts
    /// as depth 1, so a limit of 0 rejects every non-empty tree.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }
}

impl Default for DeOpts {
    fn default() -> Self {
        Self::new()
    }
}
