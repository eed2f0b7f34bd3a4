use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcript_press::cli::{Cli, Commands};
use transcript_press::config::Config;
use transcript_press::pipeline::{DocumentPipeline, RunRequest};
use transcript_press::render::{self, RendererKind, Section};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transcript_press=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load().await?;

    match cli.command {
        Commands::Channel {
            channel,
            count,
            style,
            assembly,
            renderer,
            output,
        } => {
            let request = RunRequest {
                channel,
                count,
                style,
                assembly,
                renderer,
            };

            let pipeline = DocumentPipeline::new(config);

            tracing::info!("Starting channel run: {}", request.channel);
            let context = pipeline.run(&request).await?;

            if !context.skipped.is_empty() {
                println!(
                    "Skipped {} video(s) without usable transcripts.",
                    context.skipped.len()
                );
            }

            match context.document {
                Some(document) => {
                    let path =
                        transcript_press::output::save_to_file(&document, output.as_deref())
                            .await?;
                    println!("Document saved to: {}", path.display());
                }
                None => {
                    println!("No document was produced.");
                }
            }
        }
        Commands::Render { input, output } => {
            let raw = fs_err::read_to_string(&input)?;

            // The first line of the file is the document title, matching the
            // shape the channel pipeline feeds the styled renderer.
            let (title, body) = raw.split_once('\n').unwrap_or((raw.as_str(), ""));
            let sections = vec![Section {
                title: title.trim().to_string(),
                content: body.to_string(),
            }];

            let bytes = render::render(RendererKind::Styled, &sections, &config.app.fonts)?;

            let target = output.unwrap_or_else(|| input.with_extension("pdf"));
            fs_err::write(&target, bytes)?;
            println!("Document saved to: {}", target.display());
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                config.interactive_setup().await?;
            }
        }
        Commands::Formats => {
            println!("Rewrite styles:");
            println!("  • original  - cleaned transcript, no model rewrite");
            println!("  • brainrot  - Gen Z slang rewrite of the full transcript");
            println!("  • explainer - detailed notes with learnings and actionables");
            println!();
            println!("Renderers:");
            println!("  • basic  - plain layout, falls back to raw text per section");
            println!("  • styled - fixed visual theme, one page break per section");
            println!("  • auto   - styled for explainer output, basic otherwise");
        }
    }

    Ok(())
}
