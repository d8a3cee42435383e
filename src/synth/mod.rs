//! Synthesizer: beam search and an exhaustive enumerative oracle over `Ast`
//! compositions, both pruned by the critic's hard constraints.

pub mod beam;
pub mod config;
pub mod constraint_set;
pub mod enumerative;
pub mod expansion;
pub mod pruning;
pub mod scoring;
pub mod traits;

pub use beam::BeamSynthesizer;
pub use config::SynthesisConfig;
pub use constraint_set::ConstraintSet;
pub use enumerative::EnumerativeSynthesizer;
pub use traits::{Synthesizer, SynthesisResult};
