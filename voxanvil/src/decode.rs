use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use log::{debug, trace};
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use voxnbt::{from_bytes_with_opts, DeOpts};

use crate::{read_chunk_nbt, read_locations, Chunk, ChunkLocation, Error, Result};

/// Chunk coordinates within a region, both 0..32. Displayed and serialized as
/// `"x,z"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: usize,
    pub z: usize,
}

impl ChunkCoord {
    pub fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }

    /// Parse the `"x,z"` form.
    pub fn parse(key: &str) -> Option<Self> {
        let mut s = key.split(',');
        let x = s.next()?.trim().parse().ok()?;
        let z = s.next()?.trim().parse().ok()?;
        if s.next().is_some() {
            return None;
        }
        Some(Self { x, z })
    }
}

/// A string that is not of the form `"x,z"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCoordError(String);

impl Display for ParseCoordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid chunk coordinate: {:?}", self.0)
    }
}

impl std::error::Error for ParseCoordError {}

impl FromStr for ChunkCoord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseCoordError(s.to_owned()))
    }
}

impl Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.z)
    }
}

impl Serialize for ChunkCoord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A slot that failed to decode.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub coord: ChunkCoord,
    #[serde(serialize_with = "serialize_display")]
    pub error: Error,
}

fn serialize_display<T: Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// The decoded chunks of a region, keyed by their coordinate in the region,
/// along with a diagnostic for every slot that failed to decode.
#[derive(Debug, Default, Serialize)]
pub struct RegionMap {
    chunks: HashMap<ChunkCoord, Chunk>,
    diagnostics: Vec<Diagnostic>,
}

impl RegionMap {
    pub fn get(&self, x: usize, z: usize) -> Option<&Chunk> {
        self.chunks.get(&ChunkCoord::new(x, z))
    }

    /// Look a chunk up by its `"x,z"` key.
    pub fn get_key(&self, key: &str) -> Option<&Chunk> {
        self.chunks.get(&ChunkCoord::parse(key)?)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    /// Failed slots, in location table order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_chunks(self) -> HashMap<ChunkCoord, Chunk> {
        self.chunks
    }
}

/// Options for [`RegionDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    nbt: DeOpts,
    parallel: bool,
    skip_air: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self {
            nbt: DeOpts::new(),
            parallel: true,
            skip_air: false,
        }
    }

    /// Options for decoding each chunk's tag tree.
    pub fn nbt(mut self, nbt: DeOpts) -> Self {
        self.nbt = nbt;
        self
    }

    /// Shorthand for setting the tag tree depth limit.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.nbt = self.nbt.max_depth(max_depth);
        self
    }

    /// Decode slots on the rayon thread pool. On by default.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Leave air blocks out of decoded chunks. Off by default.
    pub fn skip_air(mut self, skip_air: bool) -> Self {
        self.skip_air = skip_air;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes whole regions, or single slots of them.
#[derive(Debug, Clone, Default)]
pub struct RegionDecoder {
    opts: DecodeOptions,
}

impl RegionDecoder {
    pub fn new(opts: DecodeOptions) -> Self {
        Self { opts }
    }

    /// Decode every allocated slot of the region.
    ///
    /// Fails only if the location table itself is missing. Slots that fail
    /// to decode are left out of the map and reported in its diagnostics.
    pub fn decode(&self, region: &[u8]) -> Result<RegionMap> {
        let locations = read_locations(region)?;

        let slots: Vec<&ChunkLocation> = locations
            .iter()
            .filter(|loc| {
                if loc.is_empty() {
                    trace!("slot {} is empty", loc.coord());
                }
                !loc.is_empty()
            })
            .collect();

        // Slots share nothing but the input, so fan out and join the results
        // back in table order.
        let results: Vec<(ChunkCoord, Result<Chunk>)> = if self.opts.parallel {
            slots
                .par_iter()
                .map(|loc| (loc.coord(), self.decode_slot(region, loc)))
                .collect()
        } else {
            slots
                .iter()
                .map(|loc| (loc.coord(), self.decode_slot(region, loc)))
                .collect()
        };

        let mut map = RegionMap::default();
        for (coord, result) in results {
            match result {
                Ok(chunk) => {
                    map.chunks.insert(coord, chunk);
                }
                Err(error) => {
                    debug!("chunk {} failed to decode: {}", coord, error);
                    map.diagnostics.push(Diagnostic { coord, error });
                }
            }
        }

        Ok(map)
    }

    /// Decode a single slot: read its payload, decompress it, decode the tag
    /// tree and assemble the chunk. Callers wanting to stop part way through a
    /// region can drive this themselves with [`read_locations`].
    pub fn decode_slot(&self, region: &[u8], loc: &ChunkLocation) -> Result<Chunk> {
        let nbt = read_chunk_nbt(region, loc)?;
        let root = from_bytes_with_opts(&nbt, self.opts.nbt)?;
        Chunk::from_value(&root, self.opts.skip_air)
    }
}

/// Decode a region with default options.
pub fn decode(region: &[u8]) -> Result<RegionMap> {
    RegionDecoder::default().decode(region)
}
