//! Branch promotion engine
//!
//! Two halves:
//! 1. Plan - pure decisions (target resolution, label gate, event authorization)
//! 2. Execute - API calls driven by those decisions

mod execute;
mod plan;

pub use execute::{Promoter, PromotionReport, SkipReason, SkippedPr};
pub use plan::{
    MergeDecision, TargetBranch, decide_merge, event_authorizes_merge, pr_title, resolve_targets,
};
