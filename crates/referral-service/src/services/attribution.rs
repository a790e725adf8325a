//! Invite attribution
//!
//! Infers which invite link a new member consumed by diffing the cached
//! use counts against a freshly fetched listing, then records or
//! reactivates the referral row.

use std::collections::HashMap;

use dashmap::DashMap;
use serde_json::json;
use tracing::{info, instrument, warn};

use referral_core::entities::{AuditEvent, InviteSnapshot, Referral, RosterMember};
use referral_core::traits::{ChatGateway, MemberHistoryRepository, ReferralRepository};
use referral_core::value_objects::Snowflake;

use super::audit::AuditService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::history::HistoryService;

/// Per-guild cache of invite-code → last-known use count.
///
/// Owned by the dispatcher and handed to the resolver by reference; rebuilt
/// on ready, replaced wholesale after every join, never persisted. Two joins
/// dispatched back-to-back can race on it; that gap is known and accepted.
#[derive(Debug, Default)]
pub struct InviteCache {
    guilds: DashMap<Snowflake, HashMap<String, i32>>,
}

impl InviteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the cached counts for a guild; `None` before the first rebuild.
    pub fn counts(&self, guild_id: Snowflake) -> Option<HashMap<String, i32>> {
        self.guilds.get(&guild_id).map(|entry| entry.clone())
    }

    /// Replace a guild's counts with a fresh listing.
    pub fn replace(&self, guild_id: Snowflake, invites: &[InviteSnapshot]) {
        let counts = invites
            .iter()
            .map(|invite| (invite.code.clone(), invite.uses))
            .collect();
        self.guilds.insert(guild_id, counts);
    }

    /// Number of codes tracked for a guild.
    pub fn len(&self, guild_id: Snowflake) -> usize {
        self.guilds.get(&guild_id).map_or(0, |entry| entry.len())
    }

    pub fn is_empty(&self, guild_id: Snowflake) -> bool {
        self.len(guild_id) == 0
    }
}

/// Pick the invite that was consumed: the first one, in refreshed-listing
/// order, whose use count exceeds its cached count or which the cache has
/// never seen. First match wins, not the largest delta.
pub fn resolve_used_invite<'a>(
    cached: Option<&HashMap<String, i32>>,
    fresh: &'a [InviteSnapshot],
) -> Option<&'a InviteSnapshot> {
    fresh.iter().find(|invite| match cached {
        Some(counts) => counts
            .get(&invite.code)
            .is_none_or(|cached_uses| invite.uses > *cached_uses),
        // Cold cache: nothing to diff against, attribution is impossible.
        None => false,
    })
}

/// Outcome of processing a member join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A previously referred member came back; their row was reactivated.
    Reactivated {
        was_previous_resident: bool,
        /// Rows reactivated where the rejoiner is the inviter.
        inviter_rows: u64,
    },
    /// A fresh referral was attributed and stored.
    Attributed(Referral),
    /// No invite showed an increase (vanity or direct join).
    Unattributed,
}

/// Invite attribution service
pub struct AttributionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AttributionService<'a> {
    /// Create a new AttributionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Process a member join: reactivate a returning member's row, or diff
    /// the invite cache to attribute a new referral. The cache is refreshed
    /// with the new listing either way.
    #[instrument(skip(self, cache, member), fields(member_id = %member.id))]
    pub async fn handle_join(
        &self,
        cache: &InviteCache,
        member: &RosterMember,
    ) -> ServiceResult<JoinOutcome> {
        let guild_id = self.ctx.config().guild_id;
        let fresh = self.ctx.gateway().list_invites(guild_id).await?;
        let audit = AuditService::new(self.ctx);

        let outcome = if let Some(existing) = self
            .ctx
            .referral_repo()
            .find_by_invitee(member.id)
            .await?
        {
            // Returning member: reactivate, never re-attribute, whatever
            // invite they used this time.
            let was_previous_resident = self
                .ctx
                .history_repo()
                .held_role_before(member.id)
                .await?;

            self.ctx
                .referral_repo()
                .reactivate_invitee(member.id, was_previous_resident)
                .await?;
            let inviter_rows = self
                .ctx
                .referral_repo()
                .reactivate_inviter(member.id)
                .await?;

            info!(
                invitee_id = %member.id,
                inviter_id = %existing.inviter_id,
                was_previous_resident,
                "Reactivated returning member"
            );
            audit
                .record(AuditEvent::info(
                    "referral_reactivated",
                    json!({
                        "invitee_id": member.id,
                        "inviter_id": existing.inviter_id,
                        "was_previous_resident": was_previous_resident,
                    }),
                ))
                .await;

            JoinOutcome::Reactivated {
                was_previous_resident,
                inviter_rows,
            }
        } else {
            match resolve_used_invite(cache.counts(guild_id).as_ref(), &fresh) {
                Some(used) => {
                    let referral = Referral::new(
                        used.inviter_id,
                        used.inviter_name.clone(),
                        member.id,
                        member.display_name.clone(),
                        used.code.clone(),
                    );
                    self.ctx.referral_repo().create(&referral).await?;

                    info!(
                        invitee_id = %member.id,
                        inviter_id = %used.inviter_id,
                        code = %used.code,
                        "Attributed new referral"
                    );
                    audit
                        .record(AuditEvent::info(
                            "referral_created",
                            json!({
                                "invitee_id": member.id,
                                "inviter_id": used.inviter_id,
                                "invite_code": used.code,
                            }),
                        ))
                        .await;

                    JoinOutcome::Attributed(referral)
                }
                None => {
                    warn!(invitee_id = %member.id, "No invite showed an increase, join unattributed");
                    audit
                        .record(AuditEvent::warning(
                            "join_unattributed",
                            json!({ "invitee_id": member.id }),
                        ))
                        .await;
                    JoinOutcome::Unattributed
                }
            }
        };

        // Record the join in member history before the cache moves on.
        HistoryService::new(self.ctx).record_join(member).await?;

        cache.replace(guild_id, &fresh);
        Ok(outcome)
    }
}
