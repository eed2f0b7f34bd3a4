use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "transpress",
    about = "Transcript Press - Turn a YouTube channel's transcripts into clean PDF documents",
    version,
    long_about = "A CLI tool that fetches a channel's recent videos, pulls their caption transcripts, optionally rewrites them with a generative model, and presses the result into a downloadable PDF."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a channel's recent transcripts and press them into a PDF
    Channel {
        /// YouTube channel name to search for
        #[arg(value_name = "CHANNEL")]
        channel: String,

        /// Number of recent videos to include
        #[arg(short, long, default_value = "5", value_name = "COUNT")]
        count: u32,

        /// Rewrite style applied to each transcript
        #[arg(short, long, value_enum, default_value = "original")]
        style: RewriteStyle,

        /// Paragraph assembly strategy for the raw transcript
        #[arg(long, value_enum, default_value = "flat")]
        assembly: AssemblyMode,

        /// Document renderer (auto picks styled output for the explainer style)
        #[arg(short, long, value_enum, default_value = "auto")]
        renderer: RendererChoice,

        /// Output file path (defaults to the fixed download filename)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render a local text file into a styled PDF (first line is the title)
    Render {
        /// UTF-8 text file to render
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file path (defaults to the input name with a .pdf extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Configure API keys and settings
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },

    /// List available rewrite styles and renderers
    Formats,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewriteStyle {
    /// Cleaned transcript, no model rewrite
    Original,
    /// Gen Z slang rewrite
    Brainrot,
    /// Detailed notes with learnings and actionables
    Explainer,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssemblyMode {
    /// Join all fragments first, then clean the whole block once
    Flat,
    /// Clean each fragment, then group every four into a paragraph
    Chunked,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererChoice {
    /// Styled for the explainer style, basic otherwise
    Auto,
    /// Plain layout with a per-section plain-text fallback
    Basic,
    /// Fixed visual theme with a page break per section
    Styled,
}

impl std::fmt::Display for RewriteStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewriteStyle::Original => write!(f, "original"),
            RewriteStyle::Brainrot => write!(f, "brainrot"),
            RewriteStyle::Explainer => write!(f, "explainer"),
        }
    }
}

impl std::fmt::Display for AssemblyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssemblyMode::Flat => write!(f, "flat"),
            AssemblyMode::Chunked => write!(f, "chunked"),
        }
    }
}

impl std::fmt::Display for RendererChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RendererChoice::Auto => write!(f, "auto"),
            RendererChoice::Basic => write!(f, "basic"),
            RendererChoice::Styled => write!(f, "styled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_channel_defaults() {
        let cli = Cli::try_parse_from(["transpress", "channel", "SomeChannel"]).unwrap();
        match cli.command {
            Commands::Channel {
                channel,
                count,
                style,
                assembly,
                renderer,
                output,
            } => {
                assert_eq!(channel, "SomeChannel");
                assert_eq!(count, 5);
                assert_eq!(style, RewriteStyle::Original);
                assert_eq!(assembly, AssemblyMode::Flat);
                assert_eq!(renderer, RendererChoice::Auto);
                assert!(output.is_none());
            }
            _ => panic!("expected channel command"),
        }
    }

    #[test]
    fn test_style_values_parse() {
        for style in ["original", "brainrot", "explainer"] {
            let cli =
                Cli::try_parse_from(["transpress", "channel", "c", "--style", style]).unwrap();
            assert!(matches!(cli.command, Commands::Channel { .. }));
        }
    }
}
