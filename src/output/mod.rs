use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::pipeline::RenderedDocument;

/// Fixed download filename for a channel run.
pub const OUTPUT_FILE_NAME: &str = "transcript_press_output.pdf";

/// MIME type the document is offered under.
pub const OUTPUT_MIME_TYPE: &str = "application/pdf";

/// Save a rendered document to disk. Without an explicit path the fixed
/// download filename in the working directory is used.
pub async fn save_to_file(document: &RenderedDocument, path: Option<&Path>) -> Result<PathBuf> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&document.file_name));

    fs_err::write(&path, &document.bytes)?;
    Ok(path)
}
