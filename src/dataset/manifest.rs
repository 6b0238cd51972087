use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One source file and the number of records it is documented to hold.
///
/// Record counts are configuration, not discovery: the known dataset
/// releases document them per file, and the assembler's consistency flag
/// reports whether a file actually delivered its declared count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub records: usize,
}

/// An explicit, ordered list of source files.
///
/// Order is a contract: the assembled tensor and label list follow this
/// sequence exactly, whichever way the files are actually processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceManifest {
    pub files: Vec<SourceFile>,
}

impl SourceManifest {
    pub fn new() -> SourceManifest {
        SourceManifest { files: Vec::new() }
    }

    /// Appends one (path, declared-count) pair.
    pub fn push(&mut self, path: impl Into<PathBuf>, records: usize) {
        self.files.push(SourceFile { path: path.into(), records });
    }

    /// Builds a manifest from (path, declared-count) pairs, preserving order.
    pub fn from_pairs<P, I>(pairs: I) -> SourceManifest
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = (P, usize)>,
    {
        let files = pairs
            .into_iter()
            .map(|(path, records)| SourceFile { path: path.into(), records })
            .collect();
        SourceManifest { files }
    }

    /// Sum of declared record counts across all files.
    pub fn total_records(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Serializes the manifest to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a manifest from a JSON file previously written by
    /// `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> std::io::Result<SourceManifest> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
