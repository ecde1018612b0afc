use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{PedigreeError, Result};
use crate::graph::{RelationshipGraph, RelationshipType, Sex};

use super::locate;

impl RelationshipGraph {
    /// Read the pedigree described by a VCF header.
    ///
    /// Only the `##` meta region and the `#CHROM` column header line are
    /// consumed; reading stops at the first data line. Two `##PEDIGREE`
    /// shapes are recognized:
    ///
    /// - `##PEDIGREE=<Child=C,Father=F,Mother=M>` adds both parent edges and
    ///   records the father as male and the mother as female (the child key
    ///   may also be written `ID=`).
    /// - `##PEDIGREE=<Derived=D,Original=O>` links a derived sample (e.g. a
    ///   tumour) to the sample it came from.
    ///
    /// The sample columns after `FORMAT` in the `#CHROM` line are marked as
    /// primary genomes.
    ///
    /// # Errors
    /// Returns [`PedigreeError::Format`] for a missing `##fileformat` line,
    /// a malformed or unrecognized `##PEDIGREE` body, or an unexpected line
    /// inside the header region; [`PedigreeError::ConflictingAttribute`] if
    /// pedigree lines disagree on a parent's sex; and
    /// [`PedigreeError::Io`] if the file cannot be read.
    pub fn from_vcf_header<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::read_vcf_header(BufReader::new(file), &path.to_string_lossy())
    }

    /// Read a VCF header from any buffered reader. `source` names the input
    /// in error messages.
    pub fn read_vcf_header<R: BufRead>(reader: R, source: &str) -> Result<Self> {
        let mut graph = RelationshipGraph::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;

            if line_no == 1 {
                if !line.starts_with("##fileformat=") {
                    return Err(PedigreeError::Format {
                        path: source.to_string(),
                        line: 1,
                        reason: "Missing ##fileformat meta line".to_string(),
                    });
                }
                continue;
            }

            if let Some(body) = line.strip_prefix("##PEDIGREE=") {
                apply_pedigree_meta(&mut graph, body)
                    .map_err(|err| locate(source, line_no, err))?;
                continue;
            }
            if line.starts_with("##") {
                continue;
            }

            if line.starts_with("#CHROM") {
                // Sample columns follow the 8 fixed columns and FORMAT.
                for sample in line.split_whitespace().skip(9) {
                    graph.add_genome(sample, None)?.set_primary(true);
                }
                break;
            }

            return Err(PedigreeError::Format {
                path: source.to_string(),
                line: line_no,
                reason: "Expected a ## meta line or the #CHROM header".to_string(),
            });
        }

        Ok(graph)
    }
}

/// Apply one `##PEDIGREE=<...>` meta body to the graph.
fn apply_pedigree_meta(graph: &mut RelationshipGraph, body: &str) -> Result<()> {
    let pairs = parse_meta_pairs(body).ok_or_else(|| PedigreeError::Format {
        path: String::new(),
        line: 0,
        reason: format!("Malformed ##PEDIGREE body: '{}'", body),
    })?;

    let field = |name: &str| {
        pairs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    };

    let child = field("Child").or_else(|| field("ID"));
    if let (Some(child), Some(father), Some(mother)) = (child, field("Father"), field("Mother")) {
        graph.add_genome(father, Some(Sex::Male))?;
        graph.add_genome(mother, Some(Sex::Female))?;
        graph.add_genome(child, None)?;
        graph.add_relationship(RelationshipType::ParentChild, father, child);
        graph.add_relationship(RelationshipType::ParentChild, mother, child);
        return Ok(());
    }

    if let (Some(original), Some(derived)) = (field("Original"), field("Derived")) {
        graph.add_relationship(RelationshipType::OriginalDerived, original, derived);
        return Ok(());
    }

    Err(PedigreeError::Format {
        path: String::new(),
        line: 0,
        reason: format!("Unrecognized ##PEDIGREE shape: '{}'", body),
    })
}

/// Split `<Key=Value,...>` into pairs. Returns `None` when the body is not
/// bracketed or a pair has an empty key or value.
fn parse_meta_pairs(body: &str) -> Option<Vec<(&str, &str)>> {
    let inner = body.strip_prefix('<')?.strip_suffix('>')?;
    let mut pairs = Vec::new();
    for item in inner.split(',') {
        let (key, value) = item.split_once('=')?;
        let key = key.trim();
        let value = value.trim().trim_matches('"');
        if key.is_empty() || value.is_empty() {
            return None;
        }
        pairs.push((key, value));
    }
    Some(pairs)
}
