use crate::error::ReadError;
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A known grouping of nodes supplied alongside the graph.
pub type Structure = BTreeSet<usize>;

/// Reads one structure per line. The first token of a line names the structure and is skipped,
/// the remaining tokens are node indices.
pub fn read_structures<P: AsRef<Path>>(path: P) -> Result<Vec<Structure>, ReadError> {
    parse_structures(BufReader::new(File::open(path)?))
}

/// Lines without members are skipped and a member set that was already seen is kept only once,
/// at its first position.
pub fn parse_structures<R: BufRead>(reader: R) -> Result<Vec<Structure>, ReadError> {
    let mut structures = Vec::new();
    let mut seen = HashSet::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let mut structure = Structure::new();
        for token in line.split_ascii_whitespace().skip(1) {
            let node = token.parse::<usize>().map_err(|_| ReadError::Parse {
                line: line_idx + 1,
                token: token.to_string(),
                expected: "node index",
            })?;
            structure.insert(node);
        }

        if structure.is_empty() {
            continue;
        }
        if seen.insert(structure.clone()) {
            structures.push(structure);
        } else {
            log::debug!("line {}: duplicate structure skipped", line_idx + 1);
        }
    }

    log::debug!("read {} distinct structures", structures.len());
    Ok(structures)
}
