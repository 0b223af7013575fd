//! Database entities.

#![allow(missing_docs)]

pub mod event;
pub mod motion;
pub mod motion_vote;
pub mod motion_vote_audit;
pub mod user;

pub use event::Entity as Event;
pub use motion::Entity as Motion;
pub use motion_vote::Entity as MotionVote;
pub use motion_vote_audit::Entity as MotionVoteAudit;
pub use user::Entity as User;
