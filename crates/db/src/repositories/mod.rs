//! Repositories.
//!
//! Every repository method takes the connection it runs on, so the same
//! code serves plain reads and transaction-scoped units of work.

pub mod motion;
pub mod motion_vote;
pub mod motion_vote_audit;
pub mod user;

pub use motion::MotionRepository;
pub use motion_vote::{MotionVoteRepository, NewMotionVote};
pub use motion_vote_audit::{AuditEntry, MotionVoteAuditRepository};
pub use user::UserRepository;
