//! The text pipeline: transcript normalization, paragraph assembly, and
//! heuristic markup reconstruction of model output.

pub mod assemble;
pub mod markup;
pub mod normalize;

pub use assemble::assemble;
pub use markup::{reconstruct, RenderableSection};
pub use normalize::normalize;
