//! Identity service.

use std::{collections::BTreeSet, sync::Arc};

use assembly_common::{AppError, AppResult};
use assembly_db::repositories::UserRepository;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::{
    identity::User,
    permissions::{Permission, permissions_for},
    roles::{Role, resolve_roles},
};

/// Roles and permissions currently held by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub user_id: String,
    pub roles: BTreeSet<Role>,
    pub permissions: BTreeSet<Permission>,
}

/// Resolves bearer tokens to users.
#[derive(Clone)]
pub struct IdentityService {
    db: Arc<DatabaseConnection>,
    user_repo: UserRepository,
}

impl IdentityService {
    /// Create a new identity service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            user_repo: UserRepository::new(),
        }
    }

    /// Authenticate a user by access token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<User> {
        self.user_repo
            .find_by_token(self.db.as_ref(), token)
            .await?
            .map(User::from)
            .ok_or(AppError::Unauthorized)
    }

    /// Roles and permissions of `user`.
    #[must_use]
    pub fn capabilities(&self, user: &User) -> Capabilities {
        let roles = resolve_roles(user);
        let permissions = permissions_for(&roles);
        Capabilities {
            user_id: user.id.clone(),
            roles,
            permissions,
        }
    }
}
