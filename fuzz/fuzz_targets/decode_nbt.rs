#![no_main]
use libfuzzer_sys::fuzz_target;

use voxnbt::{from_bytes_with_opts, DeOpts};

fuzz_target!(|data: &[u8]| {
    let _ = from_bytes_with_opts(data, DeOpts::new().max_depth(64));
});
