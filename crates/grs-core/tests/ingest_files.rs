//! File-level ingestion tests: read edge lists from disk, export attacked
//! graphs, and check that error values carry the offending path and line.

use std::fs;

use grs_core::ingest::{read_edge_list, write_edge_list};
use grs_core::{ErrorCode, Graph, GraphError};
use tempfile::TempDir;

#[test]
fn reads_csv_with_header_from_disk() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("edges.csv");
    fs::write(&path, "source,target\n1,2\n1,3\n2,3\n").expect("write fixture");

    let graph: Graph = read_edge_list(&path, Some(',')).expect("readable edge list");
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("absent.csv");

    let err = read_edge_list::<i64>(&path, Some(',')).expect_err("file does not exist");
    assert_eq!(err.code(), ErrorCode::EdgeListUnreadable);
    match err {
        GraphError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn exported_graph_reads_back_with_same_hash() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("out.csv");

    let graph: Graph<String> = Graph::from_edges([
        ("hub".to_string(), "a".to_string()),
        ("hub".to_string(), "b".to_string()),
        ("a".to_string(), "b".to_string()),
    ]);

    let mut file = fs::File::create(&path).expect("create output");
    write_edge_list(&graph, &mut file).expect("write edge list");
    drop(file);

    let reread: Graph<String> = read_edge_list(&path, Some(',')).expect("readable edge list");
    assert_eq!(reread.content_hash(), graph.content_hash());
    assert_eq!(reread.summary().edges, 3);
}
