#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use mite::feature::apml::ApmlReader;
use mite::map::{CellMode, IntensityMap};

fuzz_target!(|data: &[u8]| {
    // Malformed documents must come back as errors, never panics
    let list = match ApmlReader::new(Cursor::new(data)).read("fuzz") {
        Ok(list) => list,
        Err(_) => return,
    };

    // Declared bounds are untrusted; quantizing against them must not panic either
    let _ = IntensityMap::from_feature_list(&list, CellMode::Binary);
});
