use voxnbt::{DeOpts, Value};

use super::builder::Builder;
use super::*;
use crate::*;

fn stone_chunk(x: i32, z: i32) -> Vec<u8> {
    to_bytes(&chunk(x, z, vec![stone_section(0)]))
}

/// A root compound nested `depth` compounds deep.
fn deep(depth: usize) -> Vec<u8> {
    let mut value = compound(vec![]);
    for _ in 1..depth {
        value = compound(vec![("a", value)]);
    }
    to_bytes(&value)
}

/// A region with a mix of good and bad slots.
fn mixed_region() -> Vec<u8> {
    Builder::new()
        .uncompressed(0, 0, &stone_chunk(0, 0))
        .zlib(1, 0, &stone_chunk(1, 0))
        .gzip(2, 0, &stone_chunk(2, 0))
        .chunk(3, 0, 9, &stone_chunk(3, 0))
        .zlib(0, 1, &deep(600))
        .uncompressed(5, 5, &to_bytes(&Value::Int(3)))
        .location(31, 31, 1, 1)
        .zlib(6, 6, &stone_chunk(6, 6))
        .build()
}

#[test]
fn empty_region() {
    let region = decode(&[0; REGION_HEADER_SIZE]).unwrap();

    assert!(region.is_empty());
    assert_eq!(region.len(), 0);
    assert!(region.diagnostics().is_empty());
}

#[test]
fn location_table_only_region() {
    let region = decode(&[0; SECTOR_SIZE]).unwrap();
    assert!(region.is_empty());
    assert!(region.diagnostics().is_empty());
}

#[test]
fn single_uncompressed_chunk() {
    let data = Builder::new().uncompressed(0, 0, &stone_chunk(0, 0)).build();
    let region = decode(&data).unwrap();

    assert_eq!(region.len(), 1);
    assert!(region.diagnostics().is_empty());

    let chunk = region.get_key("0,0").unwrap();
    assert_eq!(chunk.blocks.len(), 4096);
    assert_eq!(region.get(0, 0), Some(chunk));
    assert_eq!(region.get(1, 0), None);
}

#[test]
fn mixed_region_decodes_good_slots() {
    let region = decode(&mixed_region()).unwrap();

    let mut keys: Vec<String> = region.iter().map(|(c, _)| c.to_string()).collect();
    keys.sort();
    assert_eq!(keys, ["0,0", "1,0", "2,0", "6,6"]);

    for (coord, chunk) in region.iter() {
        assert_eq!(chunk.blocks.len(), 4096);
        assert_eq!(chunk.blocks[0].x as usize, coord.x * 16);
        assert_eq!(chunk.blocks[0].z as usize, coord.z * 16);
    }
}

#[test]
fn failures_are_diagnosed_in_table_order() {
    let region = decode(&mixed_region()).unwrap();

    let diags: Vec<(String, ErrorKind)> = region
        .diagnostics()
        .iter()
        .map(|d| (d.coord.to_string(), d.error.kind()))
        .collect();

    assert_eq!(
        diags,
        [
            ("3,0".to_owned(), ErrorKind::UnsupportedScheme),
            ("0,1".to_owned(), ErrorKind::TooDeep),
            ("5,5".to_owned(), ErrorKind::MalformedChunkStructure),
            ("31,31".to_owned(), ErrorKind::OutOfBounds),
        ]
    );
}

#[test]
fn sequential_matches_parallel() {
    let data = mixed_region();
    let parallel = RegionDecoder::new(DecodeOptions::new()).decode(&data).unwrap();
    let sequential = RegionDecoder::new(DecodeOptions::new().parallel(false))
        .decode(&data)
        .unwrap();

    assert_eq!(parallel.len(), sequential.len());
    for (coord, chunk) in parallel.iter() {
        assert_eq!(sequential.get(coord.x, coord.z), Some(chunk));
    }

    let kinds = |m: &RegionMap| -> Vec<(ChunkCoord, ErrorKind)> {
        m.diagnostics()
            .iter()
            .map(|d| (d.coord, d.error.kind()))
            .collect()
    };
    assert_eq!(kinds(&parallel), kinds(&sequential));
}

#[test]
fn depth_limit_is_configurable() {
    let data = Builder::new().zlib(0, 0, &deep(600)).build();

    let region = decode(&data).unwrap();
    assert!(region.is_empty());

    // Deep but otherwise valid, so it gets as far as the missing xPos.
    let opts = DecodeOptions::new().nbt(DeOpts::new().max_depth(1000));
    let region = RegionDecoder::new(opts).decode(&data).unwrap();
    assert_eq!(
        region.diagnostics()[0].error.kind(),
        ErrorKind::MalformedChunkStructure
    );

    let opts = DecodeOptions::new().max_depth(2);
    let data = Builder::new().uncompressed(0, 0, &stone_chunk(0, 0)).build();
    let region = RegionDecoder::new(opts).decode(&data).unwrap();
    assert_eq!(region.diagnostics()[0].error.kind(), ErrorKind::TooDeep);
}

#[test]
fn skip_air_option() {
    let section = section(0, &["minecraft:air"], None);
    let nbt = to_bytes(&chunk(0, 0, vec![section, stone_section(1)]));
    let data = Builder::new().zlib(0, 0, &nbt).build();

    let all = decode(&data).unwrap();
    assert_eq!(all.get(0, 0).unwrap().blocks.len(), 2 * 4096);

    let decoder = RegionDecoder::new(DecodeOptions::new().skip_air(true));
    let solid = decoder.decode(&data).unwrap();
    let chunk = solid.get(0, 0).unwrap();
    assert_eq!(chunk.blocks.len(), 4096);
    assert_eq!(chunk.min_y, 16);
}

#[test]
fn bad_tag_tree_is_diagnosed() {
    let mut nbt = stone_chunk(0, 0);
    nbt.truncate(nbt.len() / 2);
    let bad_tag = vec![10, 0, 0, 42, 0, 0];

    let data = Builder::new()
        .uncompressed(0, 0, &nbt)
        .uncompressed(1, 0, &bad_tag)
        .build();
    let region = decode(&data).unwrap();

    assert!(region.is_empty());
    assert_eq!(region.diagnostics()[0].error.kind(), ErrorKind::OutOfBounds);
    assert_eq!(region.diagnostics()[1].error.kind(), ErrorKind::InvalidTag);
}

#[test]
fn decode_slot_by_slot() {
    let data = mixed_region();
    let decoder = RegionDecoder::default();

    let results: Vec<_> = read_locations(&data)
        .unwrap()
        .iter()
        .filter(|loc| !loc.is_empty())
        .map(|loc| (loc.coord(), decoder.decode_slot(&data, loc).is_ok()))
        .collect();

    assert_eq!(results.len(), 8);
    assert_eq!(results[0], (ChunkCoord::new(0, 0), true));
    assert_eq!(results[3], (ChunkCoord::new(3, 0), false));
}

#[test]
fn chunk_bytes_survive_the_region() {
    let nbt = stone_chunk(4, 4);
    let data = Builder::new().gzip(4, 4, &nbt).build();
    let loc = read_locations(&data).unwrap()[4 * 32 + 4];

    assert_eq!(&*read_chunk_nbt(&data, &loc).unwrap(), &nbt[..]);
    let value = voxnbt::from_bytes(&read_chunk_nbt(&data, &loc).unwrap()).unwrap();
    assert_eq!(Chunk::from_value(&value, false).unwrap().blocks.len(), 4096);
}

#[test]
fn coords() {
    let c = ChunkCoord::new(12, 31);
    assert_eq!(c.to_string(), "12,31");
    assert_eq!(ChunkCoord::parse("12,31"), Some(c));
    assert_eq!(ChunkCoord::parse(" 12 , 31 "), Some(c));
    assert_eq!(ChunkCoord::parse("12"), None);
    assert_eq!(ChunkCoord::parse("1,2,3"), None);
    assert_eq!(ChunkCoord::parse("a,b"), None);
    assert_eq!(ChunkCoord::parse("-1,2"), None);

    assert_eq!("3,4".parse::<ChunkCoord>(), Ok(ChunkCoord::new(3, 4)));
    let err = "3;4".parse::<ChunkCoord>().unwrap_err();
    assert_eq!(err.to_string(), "invalid chunk coordinate: \"3;4\"");
}

#[test]
fn serializes_to_json() {
    let data = Builder::new()
        .uncompressed(0, 0, &stone_chunk(0, 0))
        .chunk(1, 0, 7, &[])
        .build();
    let region = decode(&data).unwrap();

    let json = serde_json::to_value(&region).unwrap();
    let chunk = &json["chunks"]["0,0"];

    assert_eq!(chunk["minY"], 0);
    assert_eq!(chunk["maxY"], 15);
    assert_eq!(chunk["blocks"].as_array().unwrap().len(), 4096);
    assert_eq!(
        chunk["blocks"][0],
        serde_json::json!({
            "x": 0,
            "y": 0,
            "z": 0,
            "id": "minecraft:bedrock",
            "auxData": 0,
        })
    );

    let diag = &json["diagnostics"][0];
    assert_eq!(diag["coord"], "1,0");
    assert_eq!(diag["error"], "compression scheme 7 is not supported");
}

#[test]
fn numeric_ids_serialize_as_numbers() {
    let block = Block {
        x: 1,
        y: 2,
        z: 3,
        id: BlockId::Numeric(35),
        aux_data: 14,
    };
    let json = serde_json::to_value(&block).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"x": 1, "y": 2, "z": 3, "id": 35, "auxData": 14})
    );
}

#[test]
fn chunk_position_overflow_is_diagnosed() {
    let huge = to_bytes(&chunk(i32::MAX, 0, vec![stone_section(0)]));
    let data = Builder::new()
        .zlib(0, 0, &huge)
        .zlib(1, 0, &stone_chunk(1, 0))
        .build();

    for parallel in [true, false] {
        let decoder = RegionDecoder::new(DecodeOptions::new().parallel(parallel));
        let region = decoder.decode(&data).unwrap();

        assert_eq!(region.len(), 1);
        assert_eq!(region.get(1, 0).unwrap().blocks.len(), 4096);

        let diag = &region.diagnostics()[0];
        assert_eq!(diag.coord, ChunkCoord::new(0, 0));
        assert_eq!(diag.error.kind(), ErrorKind::MalformedChunkStructure);
    }
}
