//! End-to-end scenarios over in-memory SQLite and the fake gateway
//!
//! Run with: cargo test -p integration-tests --test bot_tests

use integration_tests::fixtures::{
    invite, member, test_config, TestHarness, COMMANDS_CHANNEL, LEADERBOARD_CHANNEL,
};

use referral_bot::Dispatcher;
use referral_core::entities::{MemberAction, MemberHistoryEntry, Referral, ReferralState};
use referral_core::events::{GatewayEvent, IncomingMessage, NavDirection};
use referral_core::traits::{
    BoardMessageRepository, ChatGateway, MemberHistoryRepository, ReferralRepository,
};
use referral_core::value_objects::Snowflake;
use referral_service::{
    AttributionService, InviteCache, JoinOutcome, LeaderboardService, ValidationService,
};

const GUILD: Snowflake = Snowflake::new(1);

fn guild_message(author: referral_core::entities::RosterMember, content: &str) -> IncomingMessage {
    IncomingMessage {
        guild_id: Some(GUILD),
        channel_id: Snowflake::new(COMMANDS_CHANNEL),
        author,
        content: content.to_string(),
    }
}

fn dm_message(author: referral_core::entities::RosterMember, content: &str) -> IncomingMessage {
    IncomingMessage {
        guild_id: None,
        channel_id: author.id,
        author,
        content: content.to_string(),
    }
}

/// Insert a referral row directly, in the given state.
async fn seed_referral(
    harness: &TestHarness,
    inviter: i64,
    invitee: i64,
    state: ReferralState,
) {
    let mut referral = Referral::new(
        Snowflake::new(inviter),
        format!("user{inviter}"),
        Snowflake::new(invitee),
        format!("user{invitee}"),
        format!("code{invitee}"),
    );
    referral.state = state;
    harness.ctx.referral_repo().create(&referral).await.unwrap();
}

// ============================================================================
// Attribution
// ============================================================================

#[tokio::test]
async fn test_join_attributes_to_increased_invite() {
    let harness = TestHarness::new().await;
    let cache = InviteCache::new();

    let listing = vec![invite("abc", 100, "alice", 4), invite("def", 101, "carol", 2)];
    harness.gateway.set_invites(listing.clone());
    cache.replace(GUILD, &listing);

    harness.gateway.set_invite_uses("abc", 5);
    let bob = harness.join_roster(member(200, "bob"), false).await;

    let outcome = AttributionService::new(&harness.ctx)
        .handle_join(&cache, &bob)
        .await
        .unwrap();

    match outcome {
        JoinOutcome::Attributed(referral) => {
            assert_eq!(referral.inviter_id, Snowflake::new(100));
            assert_eq!(referral.invite_code, "abc");
        }
        other => panic!("expected attribution, got {other:?}"),
    }

    let row = harness
        .ctx
        .referral_repo()
        .find_by_invitee(Snowflake::new(200))
        .await
        .unwrap()
        .expect("referral row");
    assert_eq!(row.inviter_id, Snowflake::new(100));
    assert_eq!(row.state, ReferralState::ActivePending);
    assert!(!row.was_previous_resident);

    // The join landed in member history.
    let history = harness
        .ctx
        .history_repo()
        .find_by_member(Snowflake::new(200))
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, MemberAction::Join);

    // The cache moved to the fresh counts.
    assert_eq!(cache.counts(GUILD).unwrap().get("abc"), Some(&5));
}

#[tokio::test]
async fn test_join_without_increase_is_unattributed() {
    let harness = TestHarness::new().await;
    let cache = InviteCache::new();

    let listing = vec![invite("abc", 100, "alice", 4)];
    harness.gateway.set_invites(listing.clone());
    cache.replace(GUILD, &listing);

    let bob = harness.join_roster(member(200, "bob"), false).await;
    let outcome = AttributionService::new(&harness.ctx)
        .handle_join(&cache, &bob)
        .await
        .unwrap();

    assert_eq!(outcome, JoinOutcome::Unattributed);
    assert!(harness
        .ctx
        .referral_repo()
        .find_by_invitee(Snowflake::new(200))
        .await
        .unwrap()
        .is_none());
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_validation_requires_both_parties_role_carrying() {
    let harness = TestHarness::new().await;
    seed_referral(&harness, 100, 200, ReferralState::ActivePending).await;

    let role_id = harness.required_role_id().await;
    harness.join_roster(member(100, "alice"), true).await;
    harness.join_roster(member(200, "bob"), false).await;

    // Invitee lacks the role: still pending.
    ValidationService::new(&harness.ctx)
        .run_full_pass()
        .await
        .unwrap();
    let row = harness
        .ctx
        .referral_repo()
        .find_by_invitee(Snowflake::new(200))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.state, ReferralState::ActivePending);

    // Both carry the role: validated.
    harness.gateway.grant_role(Snowflake::new(200), role_id);
    ValidationService::new(&harness.ctx)
        .run_full_pass()
        .await
        .unwrap();
    let row = harness
        .ctx
        .referral_repo()
        .find_by_invitee(Snowflake::new(200))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.state, ReferralState::ActiveValidated);

    // Inviter loses the role: back to pending, no stale positive.
    harness.gateway.revoke_role(Snowflake::new(100), role_id);
    ValidationService::new(&harness.ctx)
        .run_full_pass()
        .await
        .unwrap();
    let row = harness
        .ctx
        .referral_repo()
        .find_by_invitee(Snowflake::new(200))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.state, ReferralState::ActivePending);
}

#[tokio::test]
async fn test_validation_pass_is_idempotent() {
    let harness = TestHarness::new().await;
    seed_referral(&harness, 100, 200, ReferralState::ActivePending).await;
    seed_referral(&harness, 100, 201, ReferralState::ActivePending).await;

    harness.join_roster(member(100, "alice"), true).await;
    harness.join_roster(member(200, "bob"), true).await;
    // 201 left the roster entirely.

    let service = ValidationService::new(&harness.ctx);
    let first = service.run_full_pass().await.unwrap();
    let snapshot_after_first = harness.ctx.referral_repo().list_active().await.unwrap();

    let second = service.run_full_pass().await.unwrap();
    let snapshot_after_second = harness.ctx.referral_repo().list_active().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(snapshot_after_first, snapshot_after_second);
}

#[tokio::test]
async fn test_validation_records_newly_observed_role_holders() {
    let harness = TestHarness::new().await;
    seed_referral(&harness, 100, 200, ReferralState::ActivePending).await;
    harness.join_roster(member(100, "alice"), true).await;
    harness.join_roster(member(200, "bob"), true).await;

    ValidationService::new(&harness.ctx)
        .run_full_pass()
        .await
        .unwrap();

    for id in [100, 200] {
        assert!(
            harness
                .ctx
                .history_repo()
                .held_role_before(Snowflake::new(id))
                .await
                .unwrap(),
            "member {id} should be on record as a role holder"
        );
    }

    // A second pass must not duplicate the observation.
    ValidationService::new(&harness.ctx)
        .run_full_pass()
        .await
        .unwrap();
    let history = harness
        .ctx
        .history_repo()
        .find_by_member(Snowflake::new(200))
        .await
        .unwrap();
    assert_eq!(
        history
            .iter()
            .filter(|e| e.action == MemberAction::Current)
            .count(),
        1
    );
}

// ============================================================================
// Leave / rejoin lifecycle (the §-scenario: join, validate, leave, rejoin)
// ============================================================================

#[tokio::test]
async fn test_member_lifecycle_join_validate_leave_rejoin() {
    let harness = TestHarness::new().await;
    let dispatcher = Dispatcher::new(harness.ctx.clone());
    let role_id = harness.required_role_id().await;

    // Ready: invite cache is rebuilt from the platform listing.
    harness
        .gateway
        .set_invites(vec![invite("abc", 100, "alice", 4)]);
    dispatcher.handle_event(GatewayEvent::Ready).await;

    // Bob joins; "abc" went 4 -> 5.
    harness.gateway.set_invite_uses("abc", 5);
    harness.join_roster(member(100, "alice"), true).await;
    let bob = harness.join_roster(member(200, "bob"), false).await;
    dispatcher
        .handle_event(GatewayEvent::MemberJoin {
            guild_id: GUILD,
            member: bob.clone(),
        })
        .await;

    let row = harness
        .ctx
        .referral_repo()
        .find_by_invitee(Snowflake::new(200))
        .await
        .unwrap()
        .expect("attributed row");
    assert_eq!(row.inviter_id, Snowflake::new(100));
    assert_eq!(row.invite_code, "abc");

    // Bob gains the role; the next pass validates the pair.
    harness.gateway.grant_role(Snowflake::new(200), role_id);
    ValidationService::new(&harness.ctx)
        .run_full_pass()
        .await
        .unwrap();
    let row = harness
        .ctx
        .referral_repo()
        .find_by_invitee(Snowflake::new(200))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.state, ReferralState::ActiveValidated);

    // Bob leaves: the row deactivates and invalidates.
    harness.gateway.remove_member(Snowflake::new(200));
    dispatcher
        .handle_event(GatewayEvent::MemberLeave {
            guild_id: GUILD,
            user_id: Snowflake::new(200),
            display_name: "bob".to_string(),
        })
        .await;
    let row = harness
        .ctx
        .referral_repo()
        .find_by_invitee(Snowflake::new(200))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.state, ReferralState::Inactive);

    // Bob rejoins: same row reactivates, validation pending again, and the
    // earlier role observation marks him a previous resident.
    harness.gateway.set_invite_uses("abc", 6);
    let bob = harness.join_roster(member(200, "bob"), false).await;
    dispatcher
        .handle_event(GatewayEvent::MemberJoin {
            guild_id: GUILD,
            member: bob,
        })
        .await;

    let rows = harness
        .ctx
        .referral_repo()
        .find_by_inviter(Snowflake::new(100))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1, "rejoin must not duplicate the row");
    assert_eq!(rows[0].state, ReferralState::ActivePending);
    assert!(rows[0].was_previous_resident);
}

#[tokio::test]
async fn test_leave_deactivates_rows_on_both_sides() {
    let harness = TestHarness::new().await;
    // Alice invited bob and carol; dave invited alice.
    seed_referral(&harness, 100, 200, ReferralState::ActiveValidated).await;
    seed_referral(&harness, 100, 201, ReferralState::ActivePending).await;
    seed_referral(&harness, 300, 100, ReferralState::ActiveValidated).await;

    let affected = harness
        .ctx
        .referral_repo()
        .deactivate_member(Snowflake::new(100))
        .await
        .unwrap();
    assert_eq!(affected, 3);

    for invitee in [200, 201, 100] {
        let row = harness
            .ctx
            .referral_repo()
            .find_by_invitee(Snowflake::new(invitee))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.state, ReferralState::Inactive, "invitee {invitee}");
    }
}

// ============================================================================
// Leaderboard
// ============================================================================

#[tokio::test]
async fn test_standings_order_validated_then_total() {
    let harness = TestHarness::new().await;
    // A: 3 validated / 5 total. B: 2 validated / 4 total. C: 3/3.
    for invitee in 0..3 {
        seed_referral(&harness, 100, 200 + invitee, ReferralState::ActiveValidated).await;
    }
    for invitee in 3..5 {
        seed_referral(&harness, 100, 200 + invitee, ReferralState::ActivePending).await;
    }
    for invitee in 0..2 {
        seed_referral(&harness, 101, 300 + invitee, ReferralState::ActiveValidated).await;
    }
    for invitee in 2..4 {
        seed_referral(&harness, 101, 300 + invitee, ReferralState::ActivePending).await;
    }
    for invitee in 0..3 {
        seed_referral(&harness, 102, 400 + invitee, ReferralState::ActiveValidated).await;
    }

    let rows = LeaderboardService::new(&harness.ctx)
        .standings()
        .await
        .unwrap();

    // Equal validated counts (A and C at 3): total breaks the tie.
    let order: Vec<i64> = rows.iter().map(|r| r.inviter_id.into_inner()).collect();
    assert_eq!(order, vec![100, 102, 101]);

    let a = &rows[0];
    assert_eq!((a.validated, a.pending, a.total), (3, 2, 5));
}

#[tokio::test]
async fn test_standings_exclude_denylisted_inviters() {
    let mut config = test_config();
    config.leaderboard.excluded_inviters = vec![Snowflake::new(100)];
    let harness = TestHarness::with_config(config).await;

    seed_referral(&harness, 100, 200, ReferralState::ActiveValidated).await;
    seed_referral(&harness, 101, 201, ReferralState::ActiveValidated).await;

    let rows = LeaderboardService::new(&harness.ctx)
        .standings()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].inviter_id, Snowflake::new(101));
}

#[tokio::test]
async fn test_standings_truncate_to_configured_size() {
    let mut config = test_config();
    config.leaderboard.size = 2;
    let harness = TestHarness::with_config(config).await;

    for inviter in 0..4 {
        seed_referral(&harness, 100 + inviter, 200 + inviter, ReferralState::ActiveValidated)
            .await;
    }

    let rows = LeaderboardService::new(&harness.ctx)
        .standings()
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_publish_edits_in_place_and_recreates_on_failure() {
    let harness = TestHarness::new().await;
    let service = LeaderboardService::new(&harness.ctx);
    let channel = Snowflake::new(LEADERBOARD_CHANNEL);

    // First publish: a fresh message, placeholder content (no referrals).
    let first = service.publish().await.unwrap();
    let live = harness.gateway.live_messages(channel);
    assert_eq!(live.len(), 1);
    assert!(live[0]
        .payload
        .content_text()
        .contains("No referrals tracked yet"));

    // Second publish: same message edited in place.
    seed_referral(&harness, 100, 200, ReferralState::ActiveValidated).await;
    harness.join_roster(member(100, "alice"), true).await;
    let second = service.publish().await.unwrap();
    assert_eq!(second.message_id, first.message_id);
    let live = harness.gateway.live_messages(channel);
    assert_eq!(live.len(), 1);
    assert!(live[0].payload.content_text().contains("alice"));

    // Edit failure: fall back to delete + recreate with a new handle.
    harness.gateway.fail_edits(true);
    let third = service.publish().await.unwrap();
    assert_ne!(third.message_id, second.message_id);
    let live = harness.gateway.live_messages(channel);
    assert_eq!(live.len(), 1, "previous board must be deleted");
    assert!(harness
        .gateway
        .find_message(second.message_id)
        .unwrap()
        .deleted);

    // The stored handle follows the recreation.
    let stored = harness
        .ctx
        .board_repo()
        .find(GUILD)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.message_id, third.message_id);
}

// ============================================================================
// Commands and guards
// ============================================================================

#[tokio::test]
async fn test_myreferrals_dm_and_cooldown() {
    let harness = TestHarness::new().await;
    let dispatcher = Dispatcher::new(harness.ctx.clone());

    seed_referral(&harness, 100, 200, ReferralState::ActivePending).await;
    let alice = harness.join_roster(member(100, "alice"), true).await;

    dispatcher
        .handle_event(GatewayEvent::MessageCreate(dm_message(
            alice.clone(),
            "!myreferrals",
        )))
        .await;

    let dms = harness.gateway.dms_to(Snowflake::new(100));
    assert_eq!(dms.len(), 1);
    let text = dms[0].payload.content_text();
    assert!(text.contains("Total referrals: 1"));
    assert!(text.contains("Pending"));

    // Second invocation inside the window: cooldown rejection.
    dispatcher
        .handle_event(GatewayEvent::MessageCreate(dm_message(
            alice.clone(),
            "!myreferrals",
        )))
        .await;
    let dms = harness.gateway.dms_to(Snowflake::new(100));
    assert_eq!(dms.len(), 2);
    assert!(dms[1].payload.content_text().contains("seconds"));

    // In-channel use of a DM-only command is rejected without touching the
    // cooldown ledger.
    dispatcher
        .handle_event(GatewayEvent::MessageCreate(guild_message(
            alice,
            "!leaderboard",
        )))
        .await;
    let channel_messages = harness
        .gateway
        .live_messages(Snowflake::new(COMMANDS_CHANNEL));
    assert!(channel_messages
        .iter()
        .any(|m| m.payload.title == "Permission Error"));
}

#[tokio::test]
async fn test_validate_requires_admin() {
    let harness = TestHarness::new().await;
    let dispatcher = Dispatcher::new(harness.ctx.clone());

    let alice = harness.join_roster(member(100, "alice"), true).await;
    dispatcher
        .handle_event(GatewayEvent::MessageCreate(guild_message(
            alice.clone(),
            "!validate",
        )))
        .await;

    let replies = harness
        .gateway
        .live_messages(Snowflake::new(COMMANDS_CHANNEL));
    assert!(replies
        .iter()
        .any(|m| m.payload.title == "Permission Error"));

    // Same command from an admin produces the report.
    let admin = harness
        .join_roster(member(1000, "admin").with_admin(true), false)
        .await;
    dispatcher
        .handle_event(GatewayEvent::MessageCreate(guild_message(
            admin,
            "!validate",
        )))
        .await;
    let replies = harness
        .gateway
        .live_messages(Snowflake::new(COMMANDS_CHANNEL));
    assert!(replies
        .iter()
        .any(|m| m.payload.title == "Final Validation Report"));
}

#[tokio::test]
async fn test_unknown_command_gets_help() {
    let harness = TestHarness::new().await;
    let dispatcher = Dispatcher::new(harness.ctx.clone());
    let alice = harness.join_roster(member(100, "alice"), false).await;

    dispatcher
        .handle_event(GatewayEvent::MessageCreate(dm_message(
            alice,
            "!frobnicate",
        )))
        .await;

    let dms = harness.gateway.dms_to(Snowflake::new(100));
    assert_eq!(dms.len(), 1);
    assert_eq!(dms[0].payload.title, "Command Not Found");
}

#[tokio::test]
async fn test_invite_stats_and_audit_logs() {
    let harness = TestHarness::new().await;
    let dispatcher = Dispatcher::new(harness.ctx.clone());

    seed_referral(&harness, 100, 200, ReferralState::ActiveValidated).await;
    seed_referral(&harness, 100, 201, ReferralState::Inactive).await;
    let admin = harness
        .join_roster(member(1000, "admin").with_admin(true), false)
        .await;

    dispatcher
        .handle_event(GatewayEvent::MessageCreate(guild_message(
            admin.clone(),
            "!invitestats",
        )))
        .await;
    let replies = harness
        .gateway
        .live_messages(Snowflake::new(COMMANDS_CHANNEL));
    let stats = replies
        .iter()
        .find(|m| m.payload.title == "Invite Statistics")
        .expect("stats reply");
    let text = stats.payload.content_text();
    assert!(text.contains("Total: 2"));
    assert!(text.contains("Active: 1"));

    // resethistory leaves an audit trail the auditlogs command can read.
    dispatcher
        .handle_event(GatewayEvent::MessageCreate(guild_message(
            admin.clone(),
            "!resethistory",
        )))
        .await;
    dispatcher
        .handle_event(GatewayEvent::MessageCreate(guild_message(
            admin,
            "!auditlogs 10",
        )))
        .await;
    let replies = harness
        .gateway
        .live_messages(Snowflake::new(COMMANDS_CHANNEL));
    let logs = replies
        .iter()
        .find(|m| m.payload.title == "Audit Log")
        .expect("audit log reply");
    assert!(logs.payload.content_text().contains("history_reset"));
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_invite_history_paginates() {
    let harness = TestHarness::new().await;
    let dispatcher = Dispatcher::new(harness.ctx.clone());

    // 23 history entries → 3 pages of 10.
    for _ in 0..23 {
        harness
            .ctx
            .history_repo()
            .append(&MemberHistoryEntry::new(
                Snowflake::new(200),
                MemberAction::Join,
                false,
            ))
            .await
            .unwrap();
    }

    let admin = harness
        .join_roster(member(1000, "admin").with_admin(true), false)
        .await;
    dispatcher
        .handle_event(GatewayEvent::MessageCreate(guild_message(
            admin,
            "!invitehistory 200",
        )))
        .await;

    let replies = harness
        .gateway
        .live_messages(Snowflake::new(COMMANDS_CHANNEL));
    let first = replies
        .iter()
        .find(|m| m.payload.title.starts_with("Invite History"))
        .expect("first page");
    assert_eq!(first.payload.footer.as_deref(), Some("Page 1/3"));

    // Owner pages forward: the message is edited to page 2.
    dispatcher
        .handle_event(GatewayEvent::Navigation {
            message_id: first.id,
            user_id: Snowflake::new(1000),
            direction: NavDirection::Next,
        })
        .await;
    let edited = harness.gateway.find_message(first.id).unwrap();
    assert_eq!(edited.payload.footer.as_deref(), Some("Page 2/3"));

    // A stranger's navigation is ignored.
    dispatcher
        .handle_event(GatewayEvent::Navigation {
            message_id: first.id,
            user_id: Snowflake::new(4242),
            direction: NavDirection::Next,
        })
        .await;
    let edited = harness.gateway.find_message(first.id).unwrap();
    assert_eq!(edited.payload.footer.as_deref(), Some("Page 2/3"));
}

// ============================================================================
// Event loop
// ============================================================================

#[tokio::test]
async fn test_bot_loop_drains_queue_then_stops() {
    let harness = TestHarness::new().await;
    let (bot, tx) = referral_bot::Bot::from_context(harness.ctx.clone());

    let alice = harness.join_roster(member(100, "alice"), false).await;
    tx.send(GatewayEvent::MessageCreate(dm_message(
        alice,
        "!myreferrals",
    )))
    .await
    .unwrap();
    drop(tx);

    // With every sender gone the loop drains the queue and returns.
    bot.run().await;

    let dms = harness.gateway.dms_to(Snowflake::new(100));
    assert_eq!(dms.len(), 1);
    assert_eq!(dms[0].payload.title, "Your Referrals");
}

// ============================================================================
// Ready / pinned guide
// ============================================================================

#[tokio::test]
async fn test_ready_pins_guide_once() {
    let harness = TestHarness::new().await;
    let dispatcher = Dispatcher::new(harness.ctx.clone());
    harness.gateway.set_invites(vec![invite("abc", 100, "alice", 4)]);

    dispatcher.handle_event(GatewayEvent::Ready).await;
    dispatcher.handle_event(GatewayEvent::Ready).await;

    let pins = harness
        .gateway
        .pinned_messages(Snowflake::new(COMMANDS_CHANNEL))
        .await
        .unwrap();
    assert_eq!(pins.len(), 1, "guide must be pinned exactly once");
    assert!(pins[0].content.contains("Referral Bot Guide"));
}
