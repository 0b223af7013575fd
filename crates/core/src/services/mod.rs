//! Business logic services.

pub mod identity;
pub mod motion_vote;

pub use identity::{Capabilities, IdentityService};
pub use motion_vote::MotionVoteService;
