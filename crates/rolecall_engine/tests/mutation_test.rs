//! Mutation API tests: caps, uniqueness, index resolution and kind changes.

mod test_utils;

use rolecall_core::{Emote, MenuKind, RoleId};
use rolecall_engine::{MessageKind, RestrictionKind, RestrictionTarget};
use rolecall_error::ReactionRoleErrorKind;
use test_utils::*;

#[tokio::test]
async fn test_sixth_message_is_rejected_without_writing() -> anyhow::Result<()> {
    let h = harness();
    for expected in 1..=5 {
        let index = h.engine.create_message(GUILD, MenuKind::Custom).await?;
        assert_eq!(index, expected);
    }

    let writes = h.store.writes();
    let err = config_error(h.engine.create_message(GUILD, MenuKind::Full).await);
    assert_eq!(err, ReactionRoleErrorKind::TooManyMessages(5));
    assert_eq!(h.store.message_count(GUILD), 5);
    assert_eq!(h.store.writes(), writes);
    Ok(())
}

#[tokio::test]
async fn test_twenty_first_pair_is_rejected() -> anyhow::Result<()> {
    let h = harness();
    h.gateway.set_guild(guild_with_extra_roles(21));
    h.engine.create_message(GUILD, MenuKind::Custom).await?;

    for offset in 0..20 {
        h.engine
            .add_pair(
                GUILD,
                None,
                &numbered_emote(offset),
                extra_role(offset.into()),
                None,
            )
            .await?;
    }
    let err = config_error(
        h.engine
            .add_pair(GUILD, None, &numbered_emote(20), extra_role(20), None)
            .await,
    );
    assert_eq!(err, ReactionRoleErrorKind::TooManyPairs(20));
    assert_eq!(h.engine.get_message(GUILD, None).await?.pairs().len(), 20);
    Ok(())
}

#[tokio::test]
async fn test_pair_validation() -> anyhow::Result<()> {
    let h = harness();
    h.engine.create_message(GUILD, MenuKind::Custom).await?;
    h.engine.add_pair(GUILD, None, "🔴", RED, None).await?;

    let cases = [
        ("🔴", BLUE, ReactionRoleErrorKind::DuplicateEmote("🔴".into())),
        ("🔵", RED, ReactionRoleErrorKind::DuplicateRole(RED.get())),
        (
            FOREIGN_EMOTE,
            BLUE,
            ReactionRoleErrorKind::ForeignEmote(FOREIGN_EMOTE.into()),
        ),
        ("blue", BLUE, ReactionRoleErrorKind::InvalidEmote("blue".into())),
        (
            "🟢🔵🟣",
            BLUE,
            ReactionRoleErrorKind::InvalidEmote("🟢🔵🟣".into()),
        ),
        (
            "🔵",
            RoleId::new(GUILD.get()),
            ReactionRoleErrorKind::RoleNotAssignable(GUILD.get()),
        ),
        ("🔵", RoleId::new(4242), ReactionRoleErrorKind::RoleNotFound(4242)),
    ];
    for (emote, role, expected) in cases {
        let err = config_error(h.engine.add_pair(GUILD, None, emote, role, None).await);
        assert_eq!(err, expected, "{emote} {role}");
    }

    h.engine.add_pair(GUILD, None, PARTY_EMOTE, BLUE, None).await?;
    let message = h.engine.get_message(GUILD, None).await?;
    assert_eq!(message.pairs().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_custom_emotes_match_by_id() -> anyhow::Result<()> {
    let h = harness();
    h.engine.create_message(GUILD, MenuKind::Custom).await?;
    h.engine.add_pair(GUILD, None, PARTY_EMOTE, RED, None).await?;

    let err = config_error(
        h.engine
            .add_pair(GUILD, None, "<:renamed:777>", BLUE, None)
            .await,
    );
    assert!(matches!(err, ReactionRoleErrorKind::DuplicateEmote(_)));
    Ok(())
}

#[tokio::test]
async fn test_index_resolution() -> anyhow::Result<()> {
    let h = harness();
    let err = config_error(h.engine.get_message(GUILD, None).await);
    assert_eq!(err, ReactionRoleErrorKind::NoMessages);

    h.engine.create_message(GUILD, MenuKind::Custom).await?;
    h.engine.create_message(GUILD, MenuKind::Full).await?;
    h.engine.create_message(GUILD, MenuKind::Custom).await?;

    let newest = h.engine.get_message(GUILD, None).await?;
    let third = h.engine.get_message(GUILD, Some(3)).await?;
    assert_eq!(newest.rrid(), third.rrid());

    let second = h.engine.get_message(GUILD, Some(2)).await?;
    assert!(matches!(second.kind(), MessageKind::Full(_)));
    let first = h.engine.get_message(GUILD, Some(1)).await?;
    assert!(first.rrid() < second.rrid());

    for index in [0, 4] {
        let err = config_error(h.engine.get_message(GUILD, Some(index)).await);
        assert_eq!(err, ReactionRoleErrorKind::IndexOutOfRange { index, count: 3 });
    }
    Ok(())
}

#[tokio::test]
async fn test_full_to_custom_keeps_pairs_and_restrictions() -> anyhow::Result<()> {
    let h = harness();
    h.engine.create_message(GUILD, MenuKind::Full).await?;
    h.engine
        .set_name(GUILD, None, Some("Colors".to_string()))
        .await?;
    h.engine
        .add_pair(GUILD, None, "🔴", RED, Some("the red team".to_string()))
        .await?;
    h.engine
        .add_restriction(
            GUILD,
            None,
            RestrictionTarget::Global,
            RestrictionKind::Prohibited,
            MUTED,
        )
        .await?;

    h.engine.set_kind(GUILD, None, MenuKind::Custom).await?;

    let message = h.engine.get_message(GUILD, None).await?;
    assert_eq!(*message.kind(), MessageKind::Custom);
    assert_eq!(message.pairs().len(), 1);
    assert_eq!(*message.pairs()[0].description(), None);
    assert!(message.global().prohibited().contains(&MUTED));

    let err = config_error(h.engine.set_kind(GUILD, None, MenuKind::Custom).await);
    assert_eq!(err, ReactionRoleErrorKind::AlreadyKind("custom"));
    let err = config_error(h.engine.set_name(GUILD, None, Some("x".into())).await);
    assert_eq!(err, ReactionRoleErrorKind::WrongKind("full"));

    // Back to full starts from empty rendering data.
    h.engine.set_kind(GUILD, None, MenuKind::Full).await?;
    let message = h.engine.get_message(GUILD, None).await?;
    match message.kind() {
        MessageKind::Full(menu) => assert_eq!(*menu.name(), None),
        MessageKind::Custom => panic!("expected full menu"),
    }
    Ok(())
}

#[tokio::test]
async fn test_full_menu_text_validation() -> anyhow::Result<()> {
    let h = harness();
    h.engine.create_message(GUILD, MenuKind::Full).await?;

    let err = config_error(h.engine.set_name(GUILD, None, Some("n".repeat(257))).await);
    assert_eq!(
        err,
        ReactionRoleErrorKind::TextTooLong {
            field: "name",
            max: 256
        }
    );
    let err = config_error(h.engine.set_color(GUILD, None, Some("teal")).await);
    assert_eq!(err, ReactionRoleErrorKind::InvalidColor("teal".into()));

    h.engine.set_color(GUILD, None, Some("#00ff00")).await?;
    match h.engine.get_message(GUILD, None).await?.kind() {
        MessageKind::Full(menu) => assert_eq!(*menu.color(), 0x00FF00),
        MessageKind::Custom => panic!("expected full menu"),
    }
    Ok(())
}

#[tokio::test]
async fn test_pair_description_requires_full_menu() -> anyhow::Result<()> {
    let h = harness();
    h.engine.create_message(GUILD, MenuKind::Custom).await?;
    let err = config_error(
        h.engine
            .add_pair(GUILD, None, "🔴", RED, Some("nope".into()))
            .await,
    );
    assert_eq!(err, ReactionRoleErrorKind::WrongKind("full"));
    assert!(h.engine.get_message(GUILD, None).await?.pairs().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_relabel_and_swap_pairs() -> anyhow::Result<()> {
    let h = harness();
    h.engine.create_message(GUILD, MenuKind::Custom).await?;
    for (emote, role) in [("🔴", RED), ("🔵", BLUE), ("🟢", GREEN)] {
        h.engine.add_pair(GUILD, None, emote, role, None).await?;
    }

    h.engine.swap_pairs(GUILD, None, "🔴", "🟢").await?;
    let message = h.engine.get_message(GUILD, None).await?;
    let roles: Vec<RoleId> = message.offered_roles().collect();
    assert_eq!(roles, vec![GREEN, BLUE, RED]);

    h.engine.relabel_pair(GUILD, None, "🔴", "🟣").await?;
    let message = h.engine.get_message(GUILD, None).await?;
    let purple = Emote::parse("🟣")?;
    assert_eq!(message.pair_for(&purple).map(|pair| *pair.role()), Some(RED));

    let err = config_error(h.engine.relabel_pair(GUILD, None, "🟣", "🔵").await);
    assert_eq!(err, ReactionRoleErrorKind::DuplicateEmote("🔵".into()));
    let err = config_error(h.engine.remove_pair(GUILD, None, "🔴").await);
    assert_eq!(err, ReactionRoleErrorKind::EmoteNotFound("🔴".into()));

    h.engine.remove_pair(GUILD, None, "🟣").await?;
    assert_eq!(h.engine.get_message(GUILD, None).await?.pairs().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_restriction_rules() -> anyhow::Result<()> {
    let h = harness();
    h.gateway.set_guild(guild_with_extra_roles(11));
    h.engine.create_message(GUILD, MenuKind::Custom).await?;
    h.engine.add_pair(GUILD, None, "🔴", RED, None).await?;
    let pair = || RestrictionTarget::Pair("🔴".to_string());

    h.engine
        .add_restriction(GUILD, None, pair(), RestrictionKind::Allowed, VIP)
        .await?;
    let err = config_error(
        h.engine
            .add_restriction(GUILD, None, pair(), RestrictionKind::Allowed, VIP)
            .await,
    );
    assert_eq!(err, ReactionRoleErrorKind::DuplicateRestriction(VIP.get()));
    let err = config_error(
        h.engine
            .add_restriction(GUILD, None, pair(), RestrictionKind::Prohibited, VIP)
            .await,
    );
    assert_eq!(err, ReactionRoleErrorKind::ConflictingRestriction(VIP.get()));
    let err = config_error(
        h.engine
            .remove_restriction(GUILD, None, pair(), RestrictionKind::Prohibited, VIP)
            .await,
    );
    assert_eq!(err, ReactionRoleErrorKind::RestrictionNotFound(VIP.get()));
    let err = config_error(
        h.engine
            .add_restriction(
                GUILD,
                None,
                RestrictionTarget::Pair("🔵".into()),
                RestrictionKind::Allowed,
                VIP,
            )
            .await,
    );
    assert_eq!(err, ReactionRoleErrorKind::EmoteNotFound("🔵".into()));

    for offset in 0..10 {
        h.engine
            .add_restriction(
                GUILD,
                None,
                RestrictionTarget::Global,
                RestrictionKind::Prohibited,
                extra_role(offset),
            )
            .await?;
    }
    let err = config_error(
        h.engine
            .add_restriction(
                GUILD,
                None,
                RestrictionTarget::Global,
                RestrictionKind::Prohibited,
                extra_role(10),
            )
            .await,
    );
    assert_eq!(err, ReactionRoleErrorKind::TooManyRestrictions(10));

    h.engine
        .remove_restriction(GUILD, None, pair(), RestrictionKind::Allowed, VIP)
        .await?;
    let message = h.engine.get_message(GUILD, None).await?;
    assert!(message.pairs()[0].restrictions().is_empty());
    assert_eq!(message.global().prohibited().len(), 10);
    Ok(())
}

#[tokio::test]
async fn test_limit_rules() -> anyhow::Result<()> {
    let h = harness();
    h.engine.create_message(GUILD, MenuKind::Custom).await?;
    h.engine.create_message(GUILD, MenuKind::Custom).await?;

    let err = config_error(h.engine.set_limit(GUILD, Some(1), 0).await);
    assert_eq!(err, ReactionRoleErrorKind::InvalidCap(0));
    let err = config_error(h.engine.remove_limit(GUILD, Some(1)).await);
    assert_eq!(err, ReactionRoleErrorKind::NoLimit(1));
    let err = config_error(h.engine.chain_limit(GUILD, Some(2), 1).await);
    assert_eq!(err, ReactionRoleErrorKind::NoLimit(1));

    h.engine.set_limit(GUILD, Some(1), 2).await?;
    let err = config_error(h.engine.chain_limit(GUILD, Some(1), 1).await);
    assert_eq!(err, ReactionRoleErrorKind::SelfChain);

    h.engine.chain_limit(GUILD, Some(2), 1).await?;
    let first = h.engine.get_message(GUILD, Some(1)).await?;
    let second = h.engine.get_message(GUILD, Some(2)).await?;
    assert!(first.limit().is_some());
    assert_eq!(first.limit(), second.limit());
    assert_eq!(h.store.limit_count(), 1);

    h.engine.remove_limit(GUILD, Some(1)).await?;
    h.engine.remove_limit(GUILD, Some(2)).await?;
    assert_eq!(h.store.limit_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_list_messages_reports_state_and_blocked_pairs() -> anyhow::Result<()> {
    let h = harness();
    h.engine.create_message(GUILD, MenuKind::Custom).await?;
    h.custom_menu(rolecall_core::MessageId::new(77), &[("🔴", RED), ("🔵", ADMIN)])
        .await?;

    let summaries = h.engine.list_messages(GUILD).await?;
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].to_string(), "#1 [custom] unconfigured, 0 pair(s)");
    assert_eq!(*summaries[1].index(), 2);
    assert_eq!(summaries[1].blocked().len(), 1);
    assert_eq!(summaries[1].blocked()[0].1, ADMIN);
    assert!(summaries[1].to_string().contains("displayed"));
    Ok(())
}

#[tokio::test]
async fn test_delete_message() -> anyhow::Result<()> {
    let h = harness();
    let message = h.full_menu(&[("🔴", RED)]).await?;
    h.engine.set_limit(GUILD, None, 1).await?;

    h.engine.delete_message(GUILD, None).await?;
    assert_eq!(h.store.message_count(GUILD), 0);
    assert_eq!(h.store.limit_count(), 0);
    assert!(h.engine.lookup(message).await.is_none());
    assert!(h.gateway.deleted().iter().any(|(_, deleted)| *deleted == message));
    Ok(())
}
