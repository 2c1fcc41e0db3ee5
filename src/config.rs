use crate::error::ConfigError;
use crate::hotspot::PartitioningConfig;
use crate::io::GraphFormat;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const KNOWN_KEYS: [&str; 8] = [
    "GraphFilename",
    "StructureFilename",
    "OutputFilename",
    "PartitionCount",
    "UseThreading",
    "FillPartitionFromStructure",
    "GraphDelimeter",
    "GraphFormat",
];

/// Settings for one run of the command line tool.
#[derive(Debug)]
pub struct RunConfig {
    pub graph_filename: PathBuf,
    pub structure_filename: PathBuf,
    /// Report destination, standard output when absent.
    pub output_filename: Option<PathBuf>,
    pub graph_format: GraphFormat,
    pub graph_delimiter: String,
    pub partitioning: PartitioningConfig,
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Parses whitespace separated `key=value` tokens. A token is split at its first `=`; the
    /// first occurrence of a key wins.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut params: HashMap<&str, &str> = HashMap::new();
        for token in content.split_ascii_whitespace() {
            match token.split_once('=') {
                Some((key, value)) => {
                    if !KNOWN_KEYS.contains(&key) {
                        log::debug!("ignoring unknown configuration key {key:?}");
                    }
                    params.entry(key).or_insert(value);
                }
                None => log::debug!("ignoring configuration token {token:?}"),
            }
        }

        let graph_filename = required(&params, "GraphFilename")?;
        let structure_filename = required(&params, "StructureFilename")?;
        let output_filename = params
            .get("OutputFilename")
            .copied()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let partition_count = match params.get("PartitionCount") {
            Some(value) => parse_count("PartitionCount", value)?,
            None => PartitioningConfig::default().partition_count,
        };
        let use_threading = parse_flag(&params, "UseThreading")?;
        let fill_partition_from_structure = parse_flag(&params, "FillPartitionFromStructure")?;

        let delimiter = params.get("GraphDelimeter").copied();
        let graph_format = match params.get("GraphFormat") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "GraphFormat",
                value: value.to_string(),
                reason: "expected matrix, labeled-matrix or edge-list",
            })?,
            None if delimiter.is_some() => GraphFormat::EdgeList,
            None => GraphFormat::Matrix,
        };

        Ok(Self {
            graph_filename: PathBuf::from(graph_filename),
            structure_filename: PathBuf::from(structure_filename),
            output_filename,
            graph_format,
            graph_delimiter: delimiter.unwrap_or(",").to_string(),
            partitioning: PartitioningConfig {
                partition_count,
                fill_partition_from_structure,
                use_threading,
            },
        })
    }
}

fn required<'a>(params: &HashMap<&str, &'a str>, key: &'static str) -> Result<&'a str, ConfigError> {
    params
        .get(key)
        .copied()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingKey(key))
}

fn parse_count(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    let invalid = |reason| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason,
    };
    let count = value
        .parse::<i64>()
        .map_err(|_| invalid("expected an integer"))?;
    if count <= 0 {
        return Err(invalid("value must be greater than zero"));
    }
    usize::try_from(count).map_err(|_| invalid("value is too large"))
}

/// Flags accept `true`/`false` or a number, where any non-zero number is true.
fn parse_flag(params: &HashMap<&str, &str>, key: &'static str) -> Result<bool, ConfigError> {
    let Some(value) = params.get(key) else {
        return Ok(false);
    };
    if value.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    value
        .parse::<f64>()
        .map(|v| v != 0.0)
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "expected true, false or a number",
        })
}
