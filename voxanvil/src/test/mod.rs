use voxnbt::{Compound, Tag, Value};

use crate::bits_per_block;

mod decode;

pub fn compound(members: Vec<(&str, Value)>) -> Value {
    Value::Compound(
        members
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect::<Compound>(),
    )
}

pub fn compound_list(elements: Vec<Value>) -> Value {
    Value::List(Tag::Compound, elements)
}

pub fn palette(names: &[&str]) -> Value {
    compound_list(
        names
            .iter()
            .map(|n| compound(vec![("Name", Value::from(*n))]))
            .collect(),
    )
}

/// Pack indices the 1.16+ way, no index crossing a long.
pub fn pack_padded(indices: &[u16], palette_len: usize) -> Vec<i64> {
    let bits = bits_per_block(palette_len);
    let per_long = 64 / bits;

    indices
        .chunks(per_long)
        .map(|chunk| {
            let mut long = 0u64;
            for (i, index) in chunk.iter().enumerate() {
                long |= (*index as u64) << (i * bits);
            }
            long as i64
        })
        .collect()
}

/// A 1.18+ section.
pub fn section(y: i8, names: &[&str], data: Option<Vec<i64>>) -> Value {
    let mut states = vec![("palette", palette(names))];
    if let Some(data) = data {
        states.push(("data", Value::LongArray(data)));
    }

    compound(vec![
        ("Y", Value::Byte(y)),
        ("block_states", compound(states)),
    ])
}

/// A 1.18+ chunk.
pub fn chunk(x: i32, z: i32, sections: Vec<Value>) -> Value {
    compound(vec![
        ("DataVersion", Value::Int(3465)),
        ("xPos", Value::Int(x)),
        ("zPos", Value::Int(z)),
        ("Status", Value::from("minecraft:full")),
        ("sections", compound_list(sections)),
    ])
}

/// Section where every cell is stone except the bottom layer, which is
/// bedrock.
pub fn stone_section(y: i8) -> Value {
    let indices: Vec<u16> = (0..4096).map(|i| if i < 256 { 1 } else { 0 }).collect();
    section(
        y,
        &["minecraft:stone", "minecraft:bedrock"],
        Some(pack_padded(&indices, 2)),
    )
}

pub fn to_bytes(value: &Value) -> Vec<u8> {
    voxnbt::test_util::to_bytes("", value)
}
