//! JSON 输出：带缩进的 `{target, outputDestination, findings}`
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::error::ScanError;
use crate::types::ResultSet;

pub(super) fn render_and_save(result: &ResultSet) -> Result<(), ScanError> {
    let dest = result.output_destination.as_str();
    let file = File::create(dest).map_err(|e| ScanError::render(dest, e))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, result).map_err(|e| ScanError::render(dest, e))?;
    out.flush().map_err(|e| ScanError::render(dest, e))?;

    tracing::info!(destination = dest, "results saved in json format");
    Ok(())
}
