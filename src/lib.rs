//! Transcript Press - A Rust CLI tool for pressing YouTube channel transcripts
//! into clean PDF documents
//!
//! This library fetches a channel's recent videos, pulls their caption
//! transcripts, optionally rewrites them with a generative model, and renders
//! the result as a paginated PDF through one of two renderer variants.

pub mod cli;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod rewrite;
pub mod sources;
pub mod text;

pub use cli::{AssemblyMode, Cli, Commands, RendererChoice, RewriteStyle};
pub use config::Config;
pub use pipeline::{DocumentPipeline, RenderedDocument, RunContext, RunRequest};
pub use render::{RendererKind, Section};
pub use sources::{TranscriptFragment, VideoMeta};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the press
#[derive(thiserror::Error, Debug)]
pub enum PressError {
    #[error("Channel '{0}' not found")]
    ChannelNotFound(String),

    #[error("Video lookup failed: {0}")]
    LookupFailed(String),

    #[error("Required font asset could not be loaded: {0}")]
    FontAssets(String),

    #[error("Document rendering failed: {0}")]
    RenderFailed(String),
}
