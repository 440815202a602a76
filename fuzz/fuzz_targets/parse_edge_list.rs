#![no_main]

use grs_core::ingest::parse_edge_list;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for delimiter in [Some(','), None] {
        if let Ok(graph) = parse_edge_list::<String>(text, delimiter) {
            assert!(graph.edge_count() <= text.lines().count());
            assert_eq!(graph.labels().count(), graph.node_count());
        }
        let _ = parse_edge_list::<i64>(text, delimiter);
    }
});
