//! Span normalization, conflict resolution and masking

mod masking;
mod normalizer;
mod resolver;

pub use masking::{MaskedPass, apply_plan, is_line_break};
pub use normalizer::normalize;
pub use resolver::{RedactionPlan, resolve};

/// Fill character for masked code points
pub const MASK_CHAR: char = '█';

#[cfg(test)]
mod tests;
