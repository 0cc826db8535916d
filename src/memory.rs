//! Memory footprint dumps.
//!
//! A dump holds one byte count per line: for each benchmark, the footprint of every version of
//! [`FOOTPRINT_VERSIONS`], in order.

use crate::{
    catalog::FOOTPRINT_VERSIONS,
    consts::BYTES_PER_MB,
    error::{Result, SweepError},
};

use tracing::warn;

use std::{fs, path::Path};

/// Memory footprints, per version then per benchmark.
#[derive(Clone, Debug, PartialEq)]
pub struct FootprintTable {
    pub benchmarks: Vec<String>,
    pub bytes: Vec<Vec<u64>>,
}

impl FootprintTable {
    pub fn read(path: &Path, benchmarks: &[String]) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| SweepError::io(path, e))?;
        Self::parse(&text, benchmarks, FOOTPRINT_VERSIONS.len(), path)
    }

    /// Parses a dump of `nb_versions` versions for each of `benchmarks`. `origin` only names the
    /// source of `text` in errors.
    pub fn parse(
        text: &str,
        benchmarks: &[String],
        nb_versions: usize,
        origin: &Path,
    ) -> Result<Self> {
        let malformed = |reason: String| SweepError::MalformedDump {
            path: origin.to_path_buf(),
            reason,
        };

        if nb_versions == 0 {
            return Err(malformed("no footprint version to read".into()));
        }

        let values = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.parse::<u64>()
                    .map_err(|_| malformed(format!("`{line}` is not a byte count")))
            })
            .collect::<Result<Vec<_>>>()?;

        let expected = benchmarks.len() * nb_versions;
        if values.len() < expected {
            return Err(malformed(format!(
                "expected {expected} footprints, found {}",
                values.len()
            )));
        }
        if values.len() > expected {
            warn!(
                "ignoring {} trailing footprints in {}",
                values.len() - expected,
                origin.display()
            );
        }

        let mut bytes = vec![Vec::with_capacity(benchmarks.len()); nb_versions];
        for per_benchmark in values[..expected].chunks(nb_versions) {
            for (v, &b) in per_benchmark.iter().enumerate() {
                bytes[v].push(b);
            }
        }
        if bytes.first().is_some_and(|base| base.contains(&0)) {
            return Err(malformed("zero footprint for the base version".into()));
        }

        Ok(Self {
            benchmarks: benchmarks.to_vec(),
            bytes,
        })
    }

    /// Footprints relative to the base version of the same benchmark.
    pub fn normalized(&self) -> Vec<Vec<f64>> {
        let Some(base) = self.bytes.first() else {
            return Vec::new();
        };
        self.bytes
            .iter()
            .map(|version| {
                version
                    .iter()
                    .zip(base)
                    .map(|(&b, &base)| b as f64 / base as f64)
                    .collect()
            })
            .collect()
    }

    /// Footprints in MB.
    pub fn megabytes(&self) -> Vec<Vec<f64>> {
        self.bytes
            .iter()
            .map(|version| version.iter().map(|&b| b as f64 / BYTES_PER_MB).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn benchmarks() -> Vec<String> {
        vec!["DGEMM".to_string(), "Sparse".to_string()]
    }

    #[test]
    fn parses_dump_order() {
        let table =
            FootprintTable::parse("100\n200\n300\n\n400\n800\n1200\n", &benchmarks(), 3, Path::new("d"))
                .unwrap();
        assert_eq!(table.bytes, vec![vec![100, 400], vec![200, 800], vec![300, 1200]]);
        assert_eq!(
            table.normalized(),
            vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]]
        );
    }

    #[test]
    fn short_dump_is_an_error() {
        let err = FootprintTable::parse("1\n2\n", &benchmarks(), 3, Path::new("d")).unwrap_err();
        assert!(matches!(err, SweepError::MalformedDump { .. }));
    }

    #[test]
    fn garbage_is_an_error() {
        let err = FootprintTable::parse("1\nabc\n", &benchmarks(), 1, Path::new("d")).unwrap_err();
        assert!(matches!(err, SweepError::MalformedDump { .. }));
    }

    #[test]
    fn zero_versions_is_an_error() {
        let err = FootprintTable::parse("1\n2\n", &benchmarks(), 0, Path::new("d")).unwrap_err();
        assert!(matches!(err, SweepError::MalformedDump { .. }));
    }

    #[test]
    fn zero_base_is_an_error() {
        assert!(FootprintTable::parse("0\n1\n", &benchmarks(), 1, Path::new("d")).is_err());
    }

    #[test]
    fn reads_megabytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let dump = (1..=6).map(|i| format!("{}\n", i * 1_048_576)).collect::<String>();
        std::io::Write::write_all(&mut file, dump.as_bytes()).unwrap();

        let table = FootprintTable::read(file.path(), &["Transpose".to_string()]).unwrap();
        assert_eq!(table.megabytes()[5], vec![6.0]);
        assert_eq!(table.normalized()[1], vec![2.0]);
    }
}
