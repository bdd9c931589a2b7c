#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use roadnet::config::{BookLoader, network_from_books};
use roadnet::network::{Backend, RoadGeometrySummary};

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        let loader = BookLoader::with_defaults();

        // Books that validate must also assemble into a network without
        // panicking.
        if let Ok(result) = loader.load_from_str(yaml_str, Path::new("<fuzz>")) {
            let geometry = RoadGeometrySummary::new(Backend::Malidrive, "fuzz");
            let _ = network_from_books(geometry, result.book);
        }
    }
});
