mod relfile;
mod vcf;

use crate::error::PedigreeError;

/// Attach the input path and line number to format errors raised without
/// location context (e.g. by tag parsing).
pub(crate) fn locate(path: &str, line: usize, err: PedigreeError) -> PedigreeError {
    match err {
        PedigreeError::Format { reason, .. } => PedigreeError::Format {
            path: path.to_string(),
            line,
            reason,
        },
        other => other,
    }
}
