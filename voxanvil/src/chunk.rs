use std::convert::TryFrom;
use std::fmt::Display;
use std::sync::Arc;

use log::debug;
use serde::Serialize;
use voxnbt::Value;

use crate::{bits_per_block, expand_indices, nibble, Error, Result, SECTION_VOLUME};

/// minY and maxY of a chunk that produced no blocks.
pub const DEFAULT_MIN_Y: i32 = 0;
pub const DEFAULT_MAX_Y: i32 = 255;

/// Identifier of a block. Palette based sections name their blocks, legacy
/// sections store a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum BlockId {
    Named(Arc<str>),
    Numeric(u16),
}

impl BlockId {
    pub fn is_air(&self) -> bool {
        match self {
            BlockId::Named(name) => matches!(
                &**name,
                "minecraft:air" | "minecraft:cave_air" | "minecraft:void_air"
            ),
            BlockId::Numeric(id) => *id == 0,
        }
    }
}

impl Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockId::Named(name) => f.write_str(name),
            BlockId::Numeric(id) => write!(f, "{}", id),
        }
    }
}

/// A single decoded block. Coordinates are absolute world coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub id: BlockId,
    /// Legacy 4-bit data value. Always 0 for palette based sections.
    pub aux_data: u8,
}

/// The decoded blocks of one chunk, in section order and then y, z, x order
/// within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub min_y: i32,
    pub max_y: i32,
    pub blocks: Vec<Block>,
}

impl Chunk {
    /// Assemble a chunk from its decoded tag tree.
    ///
    /// Three layouts are understood: 1.18+ chunks with a root `sections`
    /// list, 1.13 to 1.17 chunks with a `Level` compound holding palette
    /// based `Sections`, and older chunks whose `Sections` hold numeric
    /// `Blocks` and `Data` arrays.
    ///
    /// Sections that cannot be read are skipped, leaving a partial chunk.
    /// Only a broken overall structure is an error.
    pub fn from_value(root: &Value, skip_air: bool) -> Result<Chunk> {
        if root.as_compound().is_none() {
            return Err(malformed("root is not a compound"));
        }

        let level = match root.get("Level") {
            None => root,
            Some(level @ Value::Compound(_)) => level,
            Some(_) => return Err(malformed("Level is not a compound")),
        };

        let x_pos = position(level, "xPos")?;
        let z_pos = position(level, "zPos")?;
        let x_origin = origin(x_pos).ok_or_else(|| out_of_range("xPos", x_pos))?;
        let z_origin = origin(z_pos).ok_or_else(|| out_of_range("zPos", z_pos))?;

        let sections = match level.get("sections").or_else(|| level.get("Sections")) {
            None => &[][..],
            Some(Value::List(_, sections)) => sections.as_slice(),
            Some(_) => return Err(malformed("sections is not a list")),
        };

        let mut chunk = Chunk {
            min_y: i32::MAX,
            max_y: i32::MIN,
            blocks: vec![],
        };

        for (i, section) in sections.iter().enumerate() {
            let y = match section.get("Y").and_then(Value::as_i64) {
                Some(y) => y,
                None => {
                    debug!("chunk {},{}: section {} has no Y", x_pos, z_pos, i);
                    continue;
                }
            };
            let y_origin = match origin(y) {
                Some(y_origin) => y_origin,
                None => {
                    debug!("chunk {},{}: section y={} out of range", x_pos, z_pos, y);
                    continue;
                }
            };

            match Cells::new(section) {
                Ok(cells) => chunk.extend(&cells, (x_origin, y_origin, z_origin), skip_air),
                Err(reason) => {
                    debug!("chunk {},{}: skipping section y={}: {}", x_pos, z_pos, y, reason)
                }
            }
        }

        if chunk.blocks.is_empty() {
            chunk.min_y = DEFAULT_MIN_Y;
            chunk.max_y = DEFAULT_MAX_Y;
        }

        Ok(chunk)
    }

    /// Add the cells of a section whose lowest corner is at `origin`.
    fn extend(&mut self, cells: &Cells, origin: (i32, i32, i32), skip_air: bool) {
        let (ox, oy, oz) = origin;

        for i in 0..SECTION_VOLUME {
            let (id, aux_data) = cells.get(i);
            if skip_air && id.is_air() {
                continue;
            }

            let x = ox + (i % 16) as i32;
            let z = oz + ((i / 16) % 16) as i32;
            let y = oy + (i / 256) as i32;

            self.min_y = self.min_y.min(y);
            self.max_y = self.max_y.max(y);
            self.blocks.push(Block {
                x,
                y,
                z,
                id,
                aux_data,
            });
        }
    }
}

fn malformed(msg: &str) -> Error {
    Error::MalformedChunkStructure(msg.to_owned())
}

fn position(level: &Value, name: &str) -> Result<i64> {
    level
        .get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::MalformedChunkStructure(format!("missing {}", name)))
}

fn out_of_range(name: &str, pos: i64) -> Error {
    Error::MalformedChunkStructure(format!("{} out of range: {}", name, pos))
}

/// Block coordinate of the lowest corner of the chunk or section at `pos`.
/// None unless all 16 blocks along the axis have an i32 coordinate.
fn origin(pos: i64) -> Option<i32> {
    let origin = i32::try_from(pos).ok()?.checked_mul(16)?;
    origin.checked_add(15)?;
    Some(origin)
}

/// Validated block storage of one section. Every index in 0..4096 resolves.
enum Cells<'a> {
    Palette {
        palette: Vec<BlockId>,
        // None when the whole section is the single palette entry.
        indices: Option<Vec<u16>>,
    },
    Legacy {
        blocks: &'a [i8],
        add: Option<&'a [i8]>,
        data: Option<&'a [i8]>,
    },
}

impl<'a> Cells<'a> {
    fn new(section: &'a Value) -> std::result::Result<Self, &'static str> {
        if let Some(states) = section.get("block_states") {
            return Self::palette(states.get("palette"), states.get("data"));
        }

        if let Some(palette) = section.get("Palette") {
            return Self::palette(Some(palette), section.get("BlockStates"));
        }

        if let Some(blocks) = section.get("Blocks") {
            return Self::legacy(blocks, section.get("Add"), section.get("Data"));
        }

        Err("no block data")
    }

    fn palette(
        palette: Option<&Value>,
        data: Option<&Value>,
    ) -> std::result::Result<Self, &'static str> {
        let palette = palette.and_then(Value::as_list).ok_or("missing palette")?;
        if palette.is_empty() {
            return Err("empty palette");
        }

        let palette = palette
            .iter()
            .map(|entry| {
                entry
                    .get("Name")
                    .and_then(Value::as_str)
                    .map(|name| BlockId::Named(Arc::from(name)))
            })
            .collect::<Option<Vec<_>>>()
            .ok_or("palette entry without a name")?;

        let data = match data {
            None if palette.len() == 1 => {
                return Ok(Cells::Palette {
                    palette,
                    indices: None,
                })
            }
            None => return Err("missing block state data"),
            Some(data) => data.as_long_array().ok_or("block state data is not a long array")?,
        };

        let bits = bits_per_block(palette.len());
        let indices =
            expand_indices(data, bits, SECTION_VOLUME).ok_or("block state data too short")?;
        if indices.iter().any(|i| *i as usize >= palette.len()) {
            return Err("block state index outside palette");
        }

        Ok(Cells::Palette {
            palette,
            indices: Some(indices),
        })
    }

    fn legacy(
        blocks: &'a Value,
        add: Option<&'a Value>,
        data: Option<&'a Value>,
    ) -> std::result::Result<Self, &'static str> {
        let nibbles = |v: Option<&'a Value>| -> std::result::Result<Option<&'a [i8]>, &'static str> {
            match v {
                None => Ok(None),
                Some(v) => match v.as_byte_array() {
                    Some(arr) if arr.len() >= SECTION_VOLUME / 2 => Ok(Some(arr)),
                    _ => Err("malformed nibble array"),
                },
            }
        };

        let blocks = match blocks.as_byte_array() {
            Some(arr) if arr.len() >= SECTION_VOLUME => arr,
            _ => return Err("malformed Blocks array"),
        };

        Ok(Cells::Legacy {
            blocks,
            add: nibbles(add)?,
            data: nibbles(data)?,
        })
    }

    fn get(&self, i: usize) -> (BlockId, u8) {
        match self {
            Cells::Palette { palette, indices } => {
                let index = indices.as_ref().map_or(0, |indices| indices[i] as usize);
                (palette[index].clone(), 0)
            }
            Cells::Legacy { blocks, add, data } => {
                let high = add.map_or(0, |add| nibble(add, i) as u16);
                let id = (blocks[i] as u8) as u16 | high << 8;
                let aux = data.map_or(0, |data| nibble(data, i));
                (BlockId::Numeric(id), aux)
            }
        }
    }
}
