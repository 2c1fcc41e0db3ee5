use hotspot_partition::io::{read_graph, write_report};
use hotspot_partition::structures::read_structures;
use hotspot_partition::{Partition, PartitionEngine, RunConfig, WeightedGraph};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn write_inputs(dir: &Path, config_extra: &str) -> std::path::PathBuf {
    fs::write(
        dir.join("graph.txt"),
        "4\n0 1 0 0\n1 0 1 0\n0 1 0 1\n0 0 1 0\n",
    )
    .unwrap();
    fs::write(dir.join("structures.txt"), "left 0 1\nright 2 3\nagain 1 0\nempty\n").unwrap();
    let config = format!(
        "GraphFilename={}\nStructureFilename={}\n{}",
        dir.join("graph.txt").display(),
        dir.join("structures.txt").display(),
        config_extra
    );
    let config_path = dir.join("run.cfg");
    fs::write(&config_path, config).unwrap();
    config_path
}

#[test]
fn test_pipeline_from_files() {
    // Arrange
    let temp_dir = tempdir().unwrap();
    let config_path = write_inputs(temp_dir.path(), "PartitionCount=2\n");

    // Act
    let config = RunConfig::load(&config_path).unwrap();
    let graph: WeightedGraph<i64> =
        read_graph(&config.graph_filename, config.graph_format, &config.graph_delimiter).unwrap();
    let structures = read_structures(&config.structure_filename).unwrap();
    let outcome = PartitionEngine::new(&graph, config.partitioning.clone())
        .run(&structures)
        .unwrap();
    let mut report = Vec::new();
    write_report(&mut report, &outcome, graph.len()).unwrap();

    // Assert
    assert_eq!(structures.len(), 2);
    assert_eq!(outcome.hotspots, vec![2, 1]);
    assert_eq!(
        outcome.partitions,
        vec![Partition::from([2, 3]), Partition::from([0, 1])]
    );
    assert_eq!(
        String::from_utf8(report).unwrap(),
        "Partition Count: 2\n  [0]\n    2\n    3\n  [1]\n    0\n    1\nClaimed 4 of 3\n"
    );
}

#[test]
fn test_binary_writes_report_file() {
    // Arrange
    let temp_dir = tempdir().unwrap();
    let output = temp_dir.path().join("report.txt");
    let config_path = write_inputs(
        temp_dir.path(),
        &format!("PartitionCount=1\nOutputFilename={}\n", output.display()),
    );

    // Act
    let status = Command::new(env!("CARGO_BIN_EXE_hotspot-partition"))
        .arg(&config_path)
        .status()
        .unwrap();

    // Assert
    assert!(status.success());
    let report = fs::read_to_string(&output).unwrap();
    assert!(report.starts_with("Partition Count: 1\n  [0]\n    0\n    1\n    2\n    3\n"));
    assert!(report.ends_with("Claimed 4 of 3\n"));
}

#[test]
fn test_binary_fails_without_graph_key() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("run.cfg");
    fs::write(&config_path, "StructureFilename=s.txt\nPartitionCount=2\n").unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_hotspot-partition"))
        .arg(&config_path)
        .status()
        .unwrap();

    assert!(!status.success());
}

#[test]
fn test_binary_fails_on_unreadable_graph() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("run.cfg");
    fs::write(
        &config_path,
        format!(
            "GraphFilename={} StructureFilename=s.txt",
            temp_dir.path().join("missing.txt").display()
        ),
    )
    .unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_hotspot-partition"))
        .arg(&config_path)
        .status()
        .unwrap();

    assert!(!status.success());
}

#[test]
fn test_binary_prints_report_to_stdout() {
    let temp_dir = tempdir().unwrap();
    let config_path = write_inputs(temp_dir.path(), "PartitionCount=2\n");

    let output = Command::new(env!("CARGO_BIN_EXE_hotspot-partition"))
        .arg(&config_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Partition Count: 2\n  [0]\n    2\n    3\n  [1]\n    0\n    1\nClaimed 4 of 3\n"
    );
}
