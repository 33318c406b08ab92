#![no_main]
use libfuzzer_sys::fuzz_target;

use voxanvil::Chunk;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = voxnbt::from_bytes(data) {
        let _ = Chunk::from_value(&value, false);
    }
});
