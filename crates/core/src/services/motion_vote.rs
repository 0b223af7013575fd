//! Motion vote service.
//!
//! A submission replaces the caller's live votes for a motion as a whole and
//! appends audit rows that supersede the previous submission. Each public
//! operation runs as one transaction.

use std::collections::{BTreeSet, HashMap};

use assembly_common::{AppError, AppResult, IdGenerator};
use assembly_db::{
    TransactionCoordinator,
    entities::{
        motion::{self, MotionStatus},
        motion_vote, motion_vote_audit,
    },
    repositories::{
        AuditEntry, MotionRepository, MotionVoteAuditRepository, MotionVoteRepository,
        NewMotionVote, UserRepository,
    },
};
use sea_orm::DatabaseTransaction;

use crate::{
    definition::VoteDefinition,
    identity::User,
    normalize::{VoteCount, normalize},
    permissions::{Permission, permissions_for},
    roles::{Role, resolve_roles},
    tally::{Tally, tally},
};

/// Motion vote service for business logic.
#[derive(Clone)]
pub struct MotionVoteService {
    coordinator: TransactionCoordinator,
    motion_repo: MotionRepository,
    vote_repo: MotionVoteRepository,
    audit_repo: MotionVoteAuditRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
    require_open_motion: bool,
}

fn require(permissions: &BTreeSet<Permission>, permission: Permission) -> AppResult<()> {
    if permissions.contains(&permission) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Missing permission {permission}")))
    }
}

fn ensure_event_scope(user: &User, motion: &motion::Model) -> AppResult<()> {
    match user.bound_event_id() {
        Some(event_id) if event_id != motion.event_id => Err(AppError::Forbidden(format!(
            "Identity is bound to event {event_id}, not {}",
            motion.event_id
        ))),
        _ => Ok(()),
    }
}

fn ensure_voting_role(
    roles: &BTreeSet<Role>,
    motion: &motion::Model,
    definition: &VoteDefinition,
) -> AppResult<()> {
    if definition.allows_any(roles) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "No voting role on motion {}",
            motion.id
        )))
    }
}

impl MotionVoteService {
    /// Create a new motion vote service.
    #[must_use]
    pub const fn new(coordinator: TransactionCoordinator) -> Self {
        Self {
            coordinator,
            motion_repo: MotionRepository::new(),
            vote_repo: MotionVoteRepository::new(),
            audit_repo: MotionVoteAuditRepository::new(),
            user_repo: UserRepository::new(),
            id_gen: IdGenerator::new(),
            require_open_motion: true,
        }
    }

    /// Whether submissions require the motion to be `open`.
    #[must_use]
    pub const fn with_require_open_motion(mut self, require: bool) -> Self {
        self.require_open_motion = require;
        self
    }

    /// Replace the caller's votes on a motion with `raw_votes`.
    ///
    /// Repeated codes are merged. An empty submission withdraws every live
    /// vote while still superseding the previous audit rows. Returns the
    /// newly created live votes.
    pub async fn submit_own_votes(
        &self,
        user: &User,
        motion_id: &str,
        raw_votes: Vec<VoteCount>,
    ) -> AppResult<Vec<motion_vote::Model>> {
        let this = self.clone();
        let user = user.clone();
        let motion_id = motion_id.to_string();

        self.coordinator
            .run(move |txn| {
                Box::pin(async move { this.replace_votes(txn, &user, &motion_id, raw_votes).await })
            })
            .await
    }

    /// The caller's current live votes on a motion.
    pub async fn get_own_votes(
        &self,
        user: &User,
        motion_id: &str,
    ) -> AppResult<Vec<motion_vote::Model>> {
        let this = self.clone();
        let user = user.clone();
        let motion_id = motion_id.to_string();

        self.coordinator
            .run(move |txn| {
                Box::pin(async move {
                    let (motion, definition, roles) = this
                        .load_for_read(txn, &user, &motion_id, Permission::MotionVoteReadOwnCurrent)
                        .await?;
                    ensure_voting_role(&roles, &motion, &definition)?;

                    this.vote_repo
                        .find_by_on_behalf_user(txn, &motion.id, user.on_behalf_of_user_id())
                        .await
                })
            })
            .await
    }

    /// Every live vote on a motion.
    pub async fn get_votes_for_motion(
        &self,
        user: &User,
        motion_id: &str,
    ) -> AppResult<Vec<motion_vote::Model>> {
        let this = self.clone();
        let user = user.clone();
        let motion_id = motion_id.to_string();

        self.coordinator
            .run(move |txn| {
                Box::pin(async move {
                    let (motion, _, _) = this
                        .load_for_read(txn, &user, &motion_id, Permission::MotionVoteReadAll)
                        .await?;
                    this.vote_repo.find_by_motion(txn, &motion.id).await
                })
            })
            .await
    }

    /// Full audit history of a motion.
    pub async fn get_audit_for_motion(
        &self,
        user: &User,
        motion_id: &str,
    ) -> AppResult<Vec<motion_vote_audit::Model>> {
        let this = self.clone();
        let user = user.clone();
        let motion_id = motion_id.to_string();

        self.coordinator
            .run(move |txn| {
                Box::pin(async move {
                    let (motion, _, _) = this
                        .load_for_read(txn, &user, &motion_id, Permission::MotionVoteAuditReadAll)
                        .await?;
                    this.audit_repo.find_by_motion(txn, &motion.id).await
                })
            })
            .await
    }

    /// Audit history of the caller's own votes on a motion.
    pub async fn get_own_audit(
        &self,
        user: &User,
        motion_id: &str,
    ) -> AppResult<Vec<motion_vote_audit::Model>> {
        let this = self.clone();
        let user = user.clone();
        let motion_id = motion_id.to_string();

        self.coordinator
            .run(move |txn| {
                Box::pin(async move {
                    let (motion, _, _) = this
                        .load_for_read(txn, &user, &motion_id, Permission::MotionVoteAuditReadOwn)
                        .await?;
                    this.audit_repo
                        .find_by_on_behalf_user(txn, &motion.id, user.on_behalf_of_user_id())
                        .await
                })
            })
            .await
    }

    /// Weighted tally of the live votes on a motion.
    pub async fn tally(&self, user: &User, motion_id: &str) -> AppResult<Tally> {
        let this = self.clone();
        let user = user.clone();
        let motion_id = motion_id.to_string();

        self.coordinator
            .run(move |txn| {
                Box::pin(async move {
                    let (motion, definition, _) = this
                        .load_for_read(txn, &user, &motion_id, Permission::MotionVoteReadAll)
                        .await?;
                    let votes = this.vote_repo.find_by_motion(txn, &motion.id).await?;

                    let voter_ids: Vec<String> = votes
                        .iter()
                        .map(|vote| vote.on_behalf_of_user_id.clone())
                        .collect::<BTreeSet<_>>()
                        .into_iter()
                        .collect();
                    let weights: HashMap<String, i64> = this
                        .user_repo
                        .find_by_ids(txn, &voter_ids)
                        .await?
                        .into_iter()
                        .map(|row| {
                            let voter = User::from(row);
                            let weight = definition.weight_for(&resolve_roles(&voter));
                            (voter.id, weight)
                        })
                        .collect();

                    Ok(tally(&motion.id, &definition, &votes, |user_id| {
                        weights.get(user_id).copied().unwrap_or(0)
                    }))
                })
            })
            .await
    }

    async fn load_for_read(
        &self,
        txn: &DatabaseTransaction,
        user: &User,
        motion_id: &str,
        permission: Permission,
    ) -> AppResult<(motion::Model, VoteDefinition, BTreeSet<Role>)> {
        let motion = self.motion_repo.get_by_id(txn, motion_id).await?;
        let roles = resolve_roles(user);
        require(&permissions_for(&roles), permission)?;
        ensure_event_scope(user, &motion)?;
        let definition = VoteDefinition::from_motion(&motion)?;
        Ok((motion, definition, roles))
    }

    fn ensure_can_vote(
        &self,
        user: &User,
        roles: &BTreeSet<Role>,
        motion: &motion::Model,
        definition: &VoteDefinition,
    ) -> AppResult<()> {
        require(&permissions_for(roles), Permission::MotionVoteWriteOwn)?;
        ensure_event_scope(user, motion)?;
        ensure_voting_role(roles, motion, definition)?;
        if self.require_open_motion && motion.status != MotionStatus::Open {
            return Err(AppError::Forbidden(format!(
                "Motion {} is not open for voting",
                motion.id
            )));
        }
        Ok(())
    }

    async fn replace_votes(
        &self,
        txn: &DatabaseTransaction,
        user: &User,
        motion_id: &str,
        raw_votes: Vec<VoteCount>,
    ) -> AppResult<Vec<motion_vote::Model>> {
        let motion = self.motion_repo.get_by_id(txn, motion_id).await?;
        let definition = VoteDefinition::from_motion(&motion)?;
        let roles = resolve_roles(user);
        self.ensure_can_vote(user, &roles, &motion, &definition)?;

        let votes = normalize(raw_votes)?;
        let allowed = definition.response_codes();
        if let Some(unknown) = votes.iter().find(|vote| !allowed.contains(&vote.code)) {
            return Err(AppError::BadRequest(format!(
                "Unknown response code for motion {motion_id}: {}",
                unknown.code
            )));
        }

        let on_behalf_of_user_id = user.on_behalf_of_user_id().to_string();
        let on_behalf_of_name = match user.represented_account_id() {
            Some(account_id) => self
                .user_repo
                .get_by_id(txn, account_id)
                .await?
                .display_name(),
            None => user.display_name(),
        };
        let proxy = user.is_proxy();

        // Serializes concurrent replacements for the same pair until commit.
        self.vote_repo
            .lock_on_behalf_user(txn, motion_id, &on_behalf_of_user_id)
            .await?;

        let existing = self
            .vote_repo
            .find_by_on_behalf_user(txn, motion_id, &on_behalf_of_user_id)
            .await?;
        let prior_audit_ids: Vec<String> = self
            .audit_repo
            .find_active_by_on_behalf_user(txn, motion_id, &on_behalf_of_user_id)
            .await?
            .into_iter()
            .map(|row| row.id)
            .collect();

        let deleted = self
            .vote_repo
            .delete_by_on_behalf_user(txn, motion_id, &on_behalf_of_user_id)
            .await?;
        if deleted != existing.len() as u64 {
            tracing::warn!(
                motion_id = motion_id,
                on_behalf_of_user_id = %on_behalf_of_user_id,
                expected = existing.len(),
                deleted,
                "Deleted vote count differs from votes read"
            );
        }

        let mut created = Vec::with_capacity(votes.len());
        for vote in &votes {
            let row = self
                .vote_repo
                .create(
                    txn,
                    &allowed,
                    NewMotionVote {
                        motion_id: motion_id.to_string(),
                        on_behalf_of_user_id: on_behalf_of_user_id.clone(),
                        submitted_by_user_id: user.id.clone(),
                        response_code: vote.code.clone(),
                        votes: vote.count,
                        proxy,
                    },
                )
                .await?;
            created.push(row);
        }

        let submission_id = self.id_gen.generate_submission_id();
        let submitted_by_name = user.display_name();
        let entries = votes
            .iter()
            .map(|vote| AuditEntry {
                motion_id: motion_id.to_string(),
                submitted_by_user_id: user.id.clone(),
                submitted_by_source: user.source(),
                submitted_by_name: submitted_by_name.clone(),
                on_behalf_of_user_id: on_behalf_of_user_id.clone(),
                on_behalf_of_name: on_behalf_of_name.clone(),
                response_code: vote.code.clone(),
                votes: vote.count,
                proxy,
                supersedes: prior_audit_ids.clone(),
            })
            .collect();
        let recorded = self.audit_repo.record(txn, entries, &submission_id).await?;
        let superseded = self.audit_repo.supersede(txn, &prior_audit_ids).await?;

        tracing::info!(
            motion_id = motion_id,
            on_behalf_of_user_id = %on_behalf_of_user_id,
            submitted_by_user_id = %user.id,
            submission_id = %submission_id,
            votes = created.len(),
            audit_rows = recorded.len(),
            replaced = existing.len(),
            superseded,
            "Motion votes submitted"
        );

        Ok(created)
    }
}
