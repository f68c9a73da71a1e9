//! Consensus resolution: per-bin agreement, segment classification, and
//! description rendering under one parameterized policy.

pub mod agreement;
pub mod description;
pub mod policy;
pub mod resolver;

pub use agreement::BinAgreement;
pub use description::{DescriptionStyle, ReviewContext};
pub use policy::ConsensusPolicy;
pub use resolver::{ConsensusResolver, ResolvedSpan, SegmentResolution, SpanKind};
