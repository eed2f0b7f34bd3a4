use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::time::sleep;

use crate::cli::{AssemblyMode, RendererChoice, RewriteStyle};
use crate::config::Config;
use crate::output::{OUTPUT_FILE_NAME, OUTPUT_MIME_TYPE};
use crate::render::{self, RendererKind, Section};
use crate::rewrite::gemini::GeminiClient;
use crate::rewrite::TranscriptRewriter;
use crate::sources::captions::TimedTextSource;
use crate::sources::youtube::YoutubeDirectory;
use crate::sources::{TranscriptSource, VideoDirectory, VideoMeta};
use crate::text;

/// The final document artifact, ready to save or offer for download.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// Session state for one run: the videos that were considered, the videos
/// that had to be skipped, and the produced document if any. Passed back to
/// the caller instead of living in ambient state; a new run replaces it
/// wholesale.
#[derive(Debug, Default)]
pub struct RunContext {
    pub videos: Vec<VideoMeta>,
    pub skipped: Vec<String>,
    pub document: Option<RenderedDocument>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Everything one channel run needs to know.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub channel: String,
    pub count: u32,
    pub style: RewriteStyle,
    pub assembly: AssemblyMode,
    pub renderer: RendererChoice,
}

/// Main document pipeline: channel lookup, per-video transcript fetch,
/// assembly, optional model rewrite, and the final render.
pub struct DocumentPipeline {
    config: Config,
    directory: Box<dyn VideoDirectory>,
    transcripts: Box<dyn TranscriptSource>,
    rewriter: Box<dyn TranscriptRewriter>,
}

impl DocumentPipeline {
    /// Create a pipeline with the default network collaborators.
    pub fn new(config: Config) -> Self {
        let directory = Box::new(YoutubeDirectory::new(config.youtube.api_key.clone()));
        let transcripts = Box::new(TimedTextSource::new(config.youtube.caption_language.clone()));
        let rewriter = Box::new(GeminiClient::new(
            config.gemini.api_key.clone(),
            config.gemini.model.clone(),
            config.gemini.max_output_tokens,
        ));

        Self::with_collaborators(config, directory, transcripts, rewriter)
    }

    /// Create a pipeline with explicit collaborators.
    pub fn with_collaborators(
        config: Config,
        directory: Box<dyn VideoDirectory>,
        transcripts: Box<dyn TranscriptSource>,
        rewriter: Box<dyn TranscriptRewriter>,
    ) -> Self {
        Self {
            config,
            directory,
            transcripts,
            rewriter,
        }
    }

    /// Run one channel batch to completion.
    ///
    /// Per-video failures are reported and skipped; the batch only fails as
    /// a whole on channel lookup errors or a renderer-level fatal error.
    pub async fn run(&self, request: &RunRequest) -> Result<RunContext> {
        self.config
            .validate_for_run(request.style.instruction().is_some())?;

        tracing::info!("Looking up recent videos for channel: {}", request.channel);
        let limit = request.count.min(self.config.youtube.max_results);
        let videos = self
            .directory
            .find_recent_videos(&request.channel, limit)
            .await?;

        if videos.is_empty() {
            tracing::warn!("No videos found for channel '{}'", request.channel);
            println!(
                "{}",
                console::style("No videos found. Try a different channel name.").yellow()
            );
            return Ok(RunContext {
                videos,
                ..Default::default()
            });
        }

        let (sections, skipped) = self.collect_sections(&videos, request).await;

        if sections.is_empty() {
            tracing::warn!("Could not process any transcripts");
            println!(
                "{}",
                console::style("Could not process any transcripts.").yellow()
            );
            return Ok(RunContext {
                videos,
                skipped,
                ..Default::default()
            });
        }

        let kind = resolve_renderer(request.renderer, request.style);
        tracing::info!(
            "Rendering {} section(s) with the {} renderer",
            sections.len(),
            match kind {
                RendererKind::Basic => "basic",
                RendererKind::Styled => "styled",
            }
        );

        let bytes = render::render(kind, &sections, &self.config.app.fonts)?;

        Ok(RunContext {
            videos,
            skipped,
            document: Some(RenderedDocument {
                bytes,
                file_name: OUTPUT_FILE_NAME.to_string(),
                mime_type: OUTPUT_MIME_TYPE,
            }),
            completed_at: Some(chrono::Utc::now()),
        })
    }

    /// Fetch, assemble, and (optionally) rewrite each video's transcript,
    /// continuing past per-video failures. Returns the renderable sections
    /// and the titles of the videos that had to be skipped.
    async fn collect_sections(
        &self,
        videos: &[VideoMeta],
        request: &RunRequest,
    ) -> (Vec<Section>, Vec<String>) {
        let progress = ProgressBar::new(videos.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap(),
        );

        let mut sections = Vec::new();
        let mut skipped = Vec::new();

        for (index, video) in videos.iter().enumerate() {
            progress.set_message(format!("Fetching: {}", video.title));

            // Fixed inter-call delay to stay friendly with the caption
            // endpoint's rate limits.
            if index > 0 {
                sleep(Duration::from_secs(self.config.app.request_delay_secs)).await;
            }

            let fragments = match self.transcripts.fetch_transcript(&video.video_id).await {
                Ok(fragments) => fragments,
                Err(e) => {
                    tracing::warn!("Skipping '{}': {}", video.title, e);
                    println!(
                        "{}",
                        console::style(format!("Skipping '{}': {}", video.title, e)).yellow()
                    );
                    skipped.push(video.title.clone());
                    progress.inc(1);
                    continue;
                }
            };

            let assembled = text::assemble(&fragments, request.assembly);

            let content = match request.style.instruction() {
                None => assembled,
                Some(instruction) => {
                    progress.set_message(format!(
                        "Running '{}' rewrite on: {}",
                        request.style, video.title
                    ));
                    self.rewriter.rewrite(&assembled, instruction).await
                }
            };

            sections.push(Section {
                title: format!("Video: {}", video.title),
                content,
            });
            progress.inc(1);
        }

        progress.finish_with_message("Transcripts processed");
        (sections, skipped)
    }
}

/// Resolve the configured renderer choice to a concrete variant. Auto keeps
/// the styled theme for explainer output, whose structural cues the markup
/// reconstruction understands, and the plain layout for everything else.
fn resolve_renderer(choice: RendererChoice, style: RewriteStyle) -> RendererKind {
    match choice {
        RendererChoice::Basic => RendererKind::Basic,
        RendererChoice::Styled => RendererKind::Styled,
        RendererChoice::Auto => match style {
            RewriteStyle::Explainer => RendererKind::Styled,
            _ => RendererKind::Basic,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::MockTranscriptRewriter;
    use crate::sources::{
        MockTranscriptSource, MockVideoDirectory, TranscriptError, TranscriptFragment,
    };

    fn test_config() -> Config {
        let mut config = Config::default();
        config.youtube.api_key = "yt-key".to_string();
        config.gemini.api_key = "model-key".to_string();
        config.app.request_delay_secs = 0;
        config
    }

    fn request(style: RewriteStyle, renderer: RendererChoice) -> RunRequest {
        RunRequest {
            channel: "TestChannel".to_string(),
            count: 5,
            style,
            assembly: AssemblyMode::Flat,
            renderer,
        }
    }

    fn fragment(text: &str) -> TranscriptFragment {
        TranscriptFragment {
            text: text.to_string(),
            start_offset: 0.0,
            duration: 1.0,
        }
    }

    fn video(id: &str, title: &str) -> VideoMeta {
        VideoMeta {
            video_id: id.to_string(),
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_run_produces_document() {
        let mut directory = MockVideoDirectory::new();
        directory
            .expect_find_recent_videos()
            .returning(|_, _| Ok(vec![video("a1", "First video")]));

        let mut transcripts = MockTranscriptSource::new();
        transcripts
            .expect_fetch_transcript()
            .returning(|_| Ok(vec![fragment("hes"), fragment("going"), fragment("home.")]));

        let pipeline = DocumentPipeline::with_collaborators(
            test_config(),
            Box::new(directory),
            Box::new(transcripts),
            Box::new(MockTranscriptRewriter::new()),
        );

        let context = pipeline
            .run(&request(RewriteStyle::Original, RendererChoice::Basic))
            .await
            .unwrap();

        assert!(context.completed_at.is_some());
        let document = context.document.expect("document should be produced");
        assert!(!document.bytes.is_empty());
        assert_eq!(document.file_name, OUTPUT_FILE_NAME);
        assert_eq!(document.mime_type, "application/pdf");
        assert!(context.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_run_skips_failed_videos_and_continues() {
        let mut directory = MockVideoDirectory::new();
        directory.expect_find_recent_videos().returning(|_, _| {
            Ok(vec![
                video("a1", "Works"),
                video("a2", "Disabled"),
                video("a3", "Also works"),
            ])
        });

        let mut transcripts = MockTranscriptSource::new();
        transcripts
            .expect_fetch_transcript()
            .returning(|video_id| match video_id {
                "a2" => Err(TranscriptError::Disabled),
                _ => Ok(vec![fragment("some"), fragment("words here.")]),
            });

        let pipeline = DocumentPipeline::with_collaborators(
            test_config(),
            Box::new(directory),
            Box::new(transcripts),
            Box::new(MockTranscriptRewriter::new()),
        );

        let context = pipeline
            .run(&request(RewriteStyle::Original, RendererChoice::Basic))
            .await
            .unwrap();

        assert!(context.document.is_some());
        assert_eq!(context.skipped, vec!["Disabled".to_string()]);
    }

    #[tokio::test]
    async fn test_run_with_no_videos_produces_no_document() {
        let mut directory = MockVideoDirectory::new();
        directory
            .expect_find_recent_videos()
            .returning(|_, _| Ok(Vec::new()));

        let pipeline = DocumentPipeline::with_collaborators(
            test_config(),
            Box::new(directory),
            Box::new(MockTranscriptSource::new()),
            Box::new(MockTranscriptRewriter::new()),
        );

        let context = pipeline
            .run(&request(RewriteStyle::Original, RendererChoice::Auto))
            .await
            .unwrap();

        assert!(context.document.is_none());
        assert!(context.videos.is_empty());
    }

    #[tokio::test]
    async fn test_run_with_all_videos_failing_produces_no_document() {
        let mut directory = MockVideoDirectory::new();
        directory
            .expect_find_recent_videos()
            .returning(|_, _| Ok(vec![video("a1", "Broken")]));

        let mut transcripts = MockTranscriptSource::new();
        transcripts
            .expect_fetch_transcript()
            .returning(|_| Err(TranscriptError::NotFound));

        let pipeline = DocumentPipeline::with_collaborators(
            test_config(),
            Box::new(directory),
            Box::new(transcripts),
            Box::new(MockTranscriptRewriter::new()),
        );

        let context = pipeline
            .run(&request(RewriteStyle::Original, RendererChoice::Basic))
            .await
            .unwrap();

        assert!(context.document.is_none());
        assert_eq!(context.skipped, vec!["Broken".to_string()]);
    }

    #[tokio::test]
    async fn test_rewrite_failure_text_still_renders() {
        let mut directory = MockVideoDirectory::new();
        directory
            .expect_find_recent_videos()
            .returning(|_, _| Ok(vec![video("a1", "First video")]));

        let mut transcripts = MockTranscriptSource::new();
        transcripts
            .expect_fetch_transcript()
            .returning(|_| Ok(vec![fragment("dont"), fragment("stop now")]));

        let mut rewriter = MockTranscriptRewriter::new();
        rewriter
            .expect_rewrite()
            .returning(|_, _| "Error calling the rewrite model: model offline".to_string());

        let pipeline = DocumentPipeline::with_collaborators(
            test_config(),
            Box::new(directory),
            Box::new(transcripts),
            Box::new(rewriter),
        );

        let context = pipeline
            .run(&request(RewriteStyle::Explainer, RendererChoice::Auto))
            .await
            .unwrap();

        // The model failure becomes document content, never a pipeline error.
        assert!(context.document.is_some());
    }

    #[test]
    fn test_auto_renderer_resolution() {
        assert_eq!(
            resolve_renderer(RendererChoice::Auto, RewriteStyle::Explainer),
            RendererKind::Styled
        );
        assert_eq!(
            resolve_renderer(RendererChoice::Auto, RewriteStyle::Original),
            RendererKind::Basic
        );
        assert_eq!(
            resolve_renderer(RendererChoice::Auto, RewriteStyle::Brainrot),
            RendererKind::Basic
        );
        assert_eq!(
            resolve_renderer(RendererChoice::Basic, RewriteStyle::Explainer),
            RendererKind::Basic
        );
        assert_eq!(
            resolve_renderer(RendererChoice::Styled, RewriteStyle::Original),
            RendererKind::Styled
        );
    }
}
