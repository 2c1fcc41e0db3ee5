use crate::error::ReadError;
use crate::graph::WeightedGraph;
use crate::hotspot::PartitionOutcome;
use crate::sym_matrix::{SymmetricMatrix, Weight};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::str::FromStr;

/// Layout of a graph file.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GraphFormat {
    /// Node count followed by the N x N weights in row-major order.
    Matrix,
    /// Node count, N labels, then the N x N weights.
    LabeledMatrix,
    /// One `a<delimiter>b<delimiter>weight` record per line.
    EdgeList,
}

impl FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "matrix" => Ok(Self::Matrix),
            "labeled-matrix" => Ok(Self::LabeledMatrix),
            "edge-list" => Ok(Self::EdgeList),
            other => Err(format!("unknown graph format {other:?}")),
        }
    }
}

pub fn read_graph<T: Weight, P: AsRef<Path>>(
    path: P,
    format: GraphFormat,
    delimiter: &str,
) -> Result<WeightedGraph<T>, ReadError> {
    let reader = BufReader::new(File::open(path)?);
    match format {
        GraphFormat::Matrix => parse_matrix(reader, false),
        GraphFormat::LabeledMatrix => parse_matrix(reader, true),
        GraphFormat::EdgeList => parse_edge_list(reader, delimiter),
    }
}

/// Parses the dense matrix layouts. Tokens are whitespace separated and may span lines freely.
/// The matrix must be symmetric.
pub fn parse_matrix<T: Weight, R: BufRead>(
    reader: R,
    labeled: bool,
) -> Result<WeightedGraph<T>, ReadError> {
    let mut tokens = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        tokens.extend(
            line.split_ascii_whitespace()
                .map(|token| (line_idx + 1, token.to_string())),
        );
    }

    let mut tokens = tokens.into_iter();
    let (line, token) = tokens.next().ok_or(ReadError::Empty)?;
    let size = parse_token::<usize>(line, &token, "node count")?;

    let remaining = tokens.len();
    let expected = size
        .checked_mul(size)
        .and_then(|cells| if labeled { cells.checked_add(size) } else { Some(cells) })
        .ok_or_else(|| ReadError::Parse {
            line,
            token: token.clone(),
            expected: "node count",
        })?;
    if remaining != expected {
        return Err(ReadError::TokenCount {
            expected,
            found: remaining,
        });
    }

    let labels: Option<Vec<String>> =
        labeled.then(|| tokens.by_ref().take(size).map(|(_, label)| label).collect());

    let mut matrix = SymmetricMatrix::<T>::new(size);
    for row in 0..size {
        for col in 0..size {
            let (line, token) = tokens.next().ok_or(ReadError::TokenCount {
                expected,
                found: remaining,
            })?;
            let value = parse_token::<T>(line, &token, "edge weight")?;
            if col < row {
                if matrix.get(row, col)? != value {
                    return Err(ReadError::Asymmetric { row, col });
                }
            } else {
                matrix.set(row, col, value)?;
            }
        }
    }

    log::debug!("read {size} x {size} adjacency matrix");
    Ok(match labels {
        Some(labels) => WeightedGraph::from_labeled_matrix(labels, matrix)?,
        None => WeightedGraph::from_matrix(matrix),
    })
}

/// Parses an edge list. The node count is one more than the largest node id on any record. Records
/// with a non-positive weight count towards the node count but add no edge. Blank lines and lines
/// starting with `#` or `%` are ignored.
pub fn parse_edge_list<T: Weight, R: BufRead>(
    reader: R,
    delimiter: &str,
) -> Result<WeightedGraph<T>, ReadError> {
    let mut edges = Vec::new();
    let mut node_count = 0;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
            continue;
        }

        let fields: Vec<&str> = if delimiter.trim().is_empty() {
            trimmed.split_ascii_whitespace().collect()
        } else {
            trimmed.split(delimiter).map(str::trim).collect()
        };
        if fields.len() != 3 {
            return Err(ReadError::FieldCount {
                line: line_no,
                expected: 3,
                found: fields.len(),
            });
        }

        let a = parse_token::<usize>(line_no, fields[0], "node id")?;
        let b = parse_token::<usize>(line_no, fields[1], "node id")?;
        let weight = parse_token::<T>(line_no, fields[2], "edge weight")?;
        let largest = a.max(b).checked_add(1).ok_or_else(|| ReadError::Parse {
            line: line_no,
            token: a.max(b).to_string(),
            expected: "node id",
        })?;
        node_count = node_count.max(largest);
        if weight > T::zero() {
            edges.push((a, b, weight));
        }
    }

    let graph = WeightedGraph::from_matrix(SymmetricMatrix::try_new(node_count)?);
    for &(a, b, weight) in edges.iter() {
        graph.set_edge_weight(a, b, weight)?;
    }
    log::debug!("read {} edges over {node_count} nodes", edges.len());
    Ok(graph)
}

fn parse_token<V: FromStr>(line: usize, token: &str, expected: &'static str) -> Result<V, ReadError> {
    token.parse::<V>().map_err(|_| ReadError::Parse {
        line,
        token: token.to_string(),
        expected,
    })
}

/// Writes the partition listing followed by the claimed node count.
pub fn write_report<W: Write>(
    out: &mut W,
    outcome: &PartitionOutcome,
    graph_size: usize,
) -> std::io::Result<()> {
    writeln!(out, "Partition Count: {}", outcome.partitions.len())?;
    for (i, partition) in outcome.partitions.iter().enumerate() {
        writeln!(out, "  [{i}]")?;
        for id in partition.iter() {
            writeln!(out, "    {id}")?;
        }
    }
    writeln!(
        out,
        "Claimed {} of {}",
        outcome.claimed.len(),
        graph_size.saturating_sub(1)
    )
}

pub fn write_report_to_file<P: AsRef<Path>>(
    path: P,
    outcome: &PartitionOutcome,
    graph_size: usize,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    write_report(&mut file, outcome, graph_size)?;
    file.flush()
}
