//! Core business logic for assembly motion voting.

pub mod definition;
pub mod identity;
pub mod normalize;
pub mod permissions;
pub mod roles;
pub mod services;
pub mod tally;

pub use definition::{ResponseOption, RoleWeight, VoteDefinition};
pub use identity::{AccountDetails, LinkDetails, User, UserDetails};
pub use normalize::{VoteCount, normalize};
pub use permissions::{Permission, has_permission, permissions_for};
pub use roles::{Role, resolve_roles};
pub use services::*;
pub use tally::{Tally, TallyLine, tally};
