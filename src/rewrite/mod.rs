use async_trait::async_trait;

pub mod gemini;
pub mod prompts;

use crate::cli::RewriteStyle;

/// Trait for rewriting an assembled transcript through a generative model.
///
/// `rewrite` is deliberately infallible: a model outage must not abort a
/// batch, so implementations return an error-describing string instead of
/// propagating. The caller renders whatever comes back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptRewriter: Send + Sync {
    async fn rewrite(&self, text: &str, instruction: &str) -> String;
}

impl RewriteStyle {
    /// Instruction prompt for this style, or `None` when the transcript is
    /// passed through untouched.
    pub fn instruction(&self) -> Option<&'static str> {
        match self {
            RewriteStyle::Original => None,
            RewriteStyle::Brainrot => Some(prompts::BRAINROT_PROMPT),
            RewriteStyle::Explainer => Some(prompts::EXPLAINER_PROMPT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_style_has_no_instruction() {
        assert!(RewriteStyle::Original.instruction().is_none());
    }

    #[test]
    fn test_model_styles_carry_instructions() {
        assert!(RewriteStyle::Brainrot.instruction().is_some());
        assert!(RewriteStyle::Explainer.instruction().is_some());
    }
}
