use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{PedigreeError, Result};
use crate::graph::{RelationshipGraph, RelationshipType};

use super::locate;

impl RelationshipGraph {
    /// Read a whitespace-delimited relationship file.
    ///
    /// Each record line is `TYPE FIRST SECOND`, where `TYPE` is
    /// `PARENT_CHILD` or `ORIGINAL_DERIVED` (case-insensitive). Blank lines
    /// and lines starting with `#` are skipped. Endpoint genomes are created
    /// on first mention and are not marked primary.
    ///
    /// # Errors
    /// Returns [`PedigreeError::Format`] for a line that does not have
    /// exactly three fields or names an unknown relationship type, and
    /// [`PedigreeError::Io`] if the file cannot be read.
    pub fn from_rel_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::read_rel(BufReader::new(file), &path.to_string_lossy())
    }

    /// Read the relationship format from any buffered reader. `source` names
    /// the input in error messages.
    pub fn read_rel<R: BufRead>(reader: R, source: &str) -> Result<Self> {
        let mut graph = RelationshipGraph::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(PedigreeError::Format {
                    path: source.to_string(),
                    line: line_no,
                    reason: format!(
                        "Expected 'TYPE FIRST SECOND', found {} field(s)",
                        fields.len()
                    ),
                });
            }

            let kind = fields[0]
                .parse::<RelationshipType>()
                .map_err(|err| locate(source, line_no, err))?;
            graph.add_relationship(kind, fields[1], fields[2]);
        }

        Ok(graph)
    }
}
