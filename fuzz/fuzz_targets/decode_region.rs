#![no_main]
use libfuzzer_sys::fuzz_target;

use voxanvil::{DecodeOptions, RegionDecoder};

fuzz_target!(|data: &[u8]| {
    let decoder = RegionDecoder::new(DecodeOptions::new().parallel(false));
    if let Ok(region) = decoder.decode(data) {
        assert!(region.len() + region.diagnostics().len() <= voxanvil::CHUNK_COUNT);
    }
});
