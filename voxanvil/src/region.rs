use std::borrow::Cow;
use std::convert::TryFrom;

use voxnbt::input::Reader;

use crate::{decompress, ChunkCoord, CompressionScheme, Error, Result};

/// the size in bytes of a 'sector' in a region file. Sectors are the size unit
/// for chunks. For example, a chunk might be `3 * SECTOR_SIZE` bytes. The
/// actual compressed bytes of a chunk may be smaller and the exact value is
/// tracked in the chunk header.
pub const SECTOR_SIZE: usize = 4096;

/// the size of the region file header: the location table followed by the
/// timestamp table.
pub const REGION_HEADER_SIZE: usize = 2 * SECTOR_SIZE;

/// size of header for each chunk in the region file. This header precedes the
/// compressed chunk data.
pub const CHUNK_HEADER_SIZE: usize = 5;

/// Chunks along one side of a region.
pub const REGION_WIDTH: usize = 32;

/// Slots in a region's location table.
pub const CHUNK_COUNT: usize = REGION_WIDTH * REGION_WIDTH;

/// One entry of the location table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLocation {
    /// Chunk coordinates within the region, both 0..32.
    pub x: usize,
    pub z: usize,

    /// The offset, in units of 4kiB sectors, into the region file this chunk is
    /// located at. Offset 0 is the start of the file.
    pub offset: u32,

    /// The number of 4 kiB sectors that this chunk occupies in the region file.
    pub sectors: u8,

    /// Last modification time in seconds since the epoch, from the timestamp
    /// table. Zero if the table is missing.
    pub timestamp: u32,
}

impl ChunkLocation {
    /// Position of this slot in the location table.
    pub fn index(&self) -> usize {
        self.z * REGION_WIDTH + self.x
    }

    /// Unallocated slots have a zero offset or a zero sector count.
    pub fn is_empty(&self) -> bool {
        self.offset == 0 || self.sectors == 0
    }

    pub fn coord(&self) -> ChunkCoord {
        ChunkCoord::new(self.x, self.z)
    }
}

/// Parse the location table at the start of a region, returning all 1024
/// slots in table order, empty ones included.
///
/// Only the first 4096 bytes are required. Timestamps are read from the
/// second table when the buffer holds it.
pub fn read_locations(data: &[u8]) -> Result<Vec<ChunkLocation>> {
    if data.len() < SECTOR_SIZE {
        return Err(Error::MalformedLocationTable(data.len()));
    }

    let mut locations = Reader::new(&data[..SECTOR_SIZE]);
    let mut timestamps = data.get(SECTOR_SIZE..REGION_HEADER_SIZE).map(Reader::new);

    (0..CHUNK_COUNT)
        .map(|i| -> Result<ChunkLocation> {
            let offset = locations.read_u24()?;
            let sectors = locations.read_u8()?;
            let timestamp = match timestamps.as_mut() {
                Some(t) => t.read_u32()?,
                None => 0,
            };

            Ok(ChunkLocation {
                x: i % REGION_WIDTH,
                z: i / REGION_WIDTH,
                offset,
                sectors,
                timestamp,
            })
        })
        .collect()
}

/// The still-compressed bytes of one chunk, as stored in the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPayload<'a> {
    pub scheme: CompressionScheme,
    pub data: &'a [u8],
}

impl<'a> ChunkPayload<'a> {
    /// Locate and validate the payload for a slot. The slot should not be
    /// empty.
    ///
    /// The first 4 bytes of a payload are its length, which counts the
    /// following compression scheme byte. The length has to fit in the sectors
    /// the location table gives the chunk, and in what is left of the region.
    pub fn read(region: &'a [u8], loc: &ChunkLocation) -> Result<Self> {
        let out_of_bounds = Error::SectorOutOfBounds {
            offset: loc.offset,
            sectors: loc.sectors,
        };
        let start = match (loc.offset as usize).checked_mul(SECTOR_SIZE) {
            Some(start) if start >= REGION_HEADER_SIZE => start,
            _ => return Err(out_of_bounds),
        };

        let mut r = Reader::new(region);
        r.skip(start)?;

        let declared = r.read_u32()?;
        let id = r.read_u8()?;
        let scheme = CompressionScheme::try_from(id).map_err(|_| Error::UnsupportedScheme(id))?;

        // the length field itself is not part of the length.
        let allotted = (loc.sectors as usize * SECTOR_SIZE).saturating_sub(4);
        if declared == 0 || declared as usize > allotted {
            return Err(Error::LengthMismatch { declared, allotted });
        }

        // The declared length has to be backed by bytes that are really there.
        let len = declared as usize - 1;
        if len > r.remaining() {
            return Err(Error::LengthMismatch {
                declared,
                allotted: r.remaining() + 1,
            });
        }

        let data = r.read_bytes(len)?;
        Ok(Self { scheme, data })
    }

    /// Decompress into the uncompressed tag tree bytes.
    pub fn decompress(&self) -> Result<Cow<'a, [u8]>> {
        decompress(self.scheme, self.data)
    }
}

/// Read the uncompressed tag tree bytes for the chunk in the given slot.
pub fn read_chunk_nbt<'a>(region: &'a [u8], loc: &ChunkLocation) -> Result<Cow<'a, [u8]>> {
    ChunkPayload::read(region, loc)?.decompress()
}
