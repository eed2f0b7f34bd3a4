use crate::cli::AssemblyMode;
use crate::sources::TranscriptFragment;

use super::normalize;

/// Number of consecutive fragments joined into one paragraph by the chunked
/// strategy.
pub const CHUNK_SIZE: usize = 4;

/// Assemble ordered caption fragments into a single body string.
///
/// The two strategies are intentionally kept as distinct behaviors: the flat
/// strategy joins the raw fragment texts first and normalizes the whole block
/// once, which repairs contractions split across fragment boundaries; the
/// chunked strategy normalizes each fragment independently and cannot.
pub fn assemble(fragments: &[TranscriptFragment], mode: AssemblyMode) -> String {
    match mode {
        AssemblyMode::Flat => assemble_flat(fragments),
        AssemblyMode::Chunked => assemble_chunked(fragments),
    }
}

/// Join every raw fragment with a single space, then clean the entire block
/// at once.
fn assemble_flat(fragments: &[TranscriptFragment]) -> String {
    let joined = fragments
        .iter()
        .map(|fragment| fragment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    normalize(&joined)
}

/// Normalize each fragment independently, join runs of [`CHUNK_SIZE`] into
/// paragraphs, and separate paragraphs with a blank line.
fn assemble_chunked(fragments: &[TranscriptFragment]) -> String {
    let cleaned: Vec<String> = fragments
        .iter()
        .map(|fragment| normalize(&fragment.text))
        .collect();

    cleaned
        .chunks(CHUNK_SIZE)
        .map(|chunk| chunk.join(" "))
        .collect::<Vec<_>>()
        .join("\n\n")
}
