//! For decoding region files, the container format voxel worlds are saved in.
//!
//! A region holds up to 1024 chunks behind a fixed location table. Use
//! [`decode`] to turn a whole region held in memory into a [`RegionMap`] of
//! [`Chunk`]s, or drive [`RegionDecoder::decode_slot`] yourself to decode one
//! slot at a time.
//!
//! ```no_run
//! let data = std::fs::read("r.0.0.mca").unwrap();
//! let region = voxanvil::decode(&data).unwrap();
//!
//! for (coord, chunk) in region.iter() {
//!     println!("{}: {} blocks", coord, chunk.blocks.len());
//! }
//! for diag in region.diagnostics() {
//!     eprintln!("{}: {}", diag.coord, diag.error);
//! }
//! ```

mod bits;
mod chunk;
mod compression;
mod decode;
mod region;

pub use bits::*;
pub use chunk::*;
pub use compression::*;
pub use decode::*;
pub use region::*;

#[cfg(test)]
mod test;

/// Errors from decoding a region. Only [`Error::MalformedLocationTable`] fails
/// a whole region; everything else is reported against the slot it happened
/// in.
#[derive(Debug, Clone)]
pub enum Error {
    /// The buffer was shorter than the location table. Holds the buffer size.
    MalformedLocationTable(usize),
    /// A location pointed into the region header.
    SectorOutOfBounds { offset: u32, sectors: u8 },
    UnsupportedScheme(u8),
    /// Decompression failed, including checksum failures.
    CorruptPayload(String),
    /// The declared payload length does not fit the sectors given to it, or
    /// runs past the end of the region.
    LengthMismatch { declared: u32, allotted: usize },
    MalformedChunkStructure(String),
    /// Reading raw bytes or the tag tree failed.
    Nbt(voxnbt::error::Error),
}

/// The kind of an [`Error`], flattened so that byte-level and tree-level
/// failures can be told apart without matching on [`voxnbt`] errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    OutOfBounds,
    MalformedLocationTable,
    UnsupportedScheme,
    CorruptPayload,
    LengthMismatch,
    InvalidString,
    InvalidTag,
    TooDeep,
    MalformedChunkStructure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use voxnbt::error::ErrorKind as Nbt;

        match self {
            Error::MalformedLocationTable(_) => ErrorKind::MalformedLocationTable,
            Error::SectorOutOfBounds { .. } => ErrorKind::OutOfBounds,
            Error::UnsupportedScheme(_) => ErrorKind::UnsupportedScheme,
            Error::CorruptPayload(_) => ErrorKind::CorruptPayload,
            Error::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            Error::MalformedChunkStructure(_) => ErrorKind::MalformedChunkStructure,
            Error::Nbt(e) => match e.kind() {
                Nbt::OutOfBounds => ErrorKind::OutOfBounds,
                Nbt::InvalidString => ErrorKind::InvalidString,
                Nbt::TooDeep => ErrorKind::TooDeep,
                Nbt::InvalidTag => ErrorKind::InvalidTag,
                _ => ErrorKind::MalformedChunkStructure,
            },
        }
    }
}

impl From<voxnbt::error::Error> for Error {
    fn from(err: voxnbt::error::Error) -> Error {
        Error::Nbt(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::CorruptPayload(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedLocationTable(len) => write!(
                f,
                "malformed location table: region is {} bytes, need at least {}",
                len, SECTOR_SIZE
            ),
            Error::SectorOutOfBounds { offset, sectors } => write!(
                f,
                "chunk location out of bounds: offset = {}, sectors = {}",
                offset, sectors
            ),
            Error::UnsupportedScheme(id) => {
                write!(f, "compression scheme {} is not supported", id)
            }
            Error::CorruptPayload(msg) => write!(f, "corrupt chunk payload: {}", msg),
            Error::LengthMismatch { declared, allotted } => write!(
                f,
                "declared chunk length {} does not fit the {} bytes allotted",
                declared, allotted
            ),
            Error::MalformedChunkStructure(msg) => write!(f, "malformed chunk: {}", msg),
            Error::Nbt(e) => write!(f, "nbt: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Nbt(e) => Some(e),
            _ => None,
        }
    }
}
