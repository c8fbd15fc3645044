//! Posting menus and keeping posted menus in line with configuration.

mod test_utils;

use rolecall_core::{ChannelId, MenuKind, MessageId};
use rolecall_engine::{EngineSettings, MenuState};
use rolecall_error::ReactionRoleErrorKind;
use test_utils::*;

#[tokio::test]
async fn test_display_twice_edits_in_place() -> anyhow::Result<()> {
    let h = harness();
    let posted = h.full_menu(&[("🔴", RED), ("🔵", BLUE)]).await?;
    assert_eq!(h.gateway.sent().len(), 1);
    assert_eq!(h.gateway.restricted(), vec![CHANNEL]);
    assert_eq!(h.gateway.reactions().len(), 2);

    let again = h.engine.display(GUILD, None, None).await?;
    assert_eq!(again, posted);
    assert_eq!(h.gateway.sent().len(), 1);
    assert_eq!(h.gateway.edits().len(), 1);

    let message = h.engine.get_message(GUILD, None).await?;
    assert_eq!(message.state(), MenuState::Displayed);
    assert_eq!(message.binding(), Some((CHANNEL, posted)));
    Ok(())
}

#[tokio::test]
async fn test_display_renders_menu_content() -> anyhow::Result<()> {
    let h = harness();
    h.engine.create_message(GUILD, MenuKind::Full).await?;
    h.engine
        .set_name(GUILD, None, Some("Pick a team".to_string()))
        .await?;
    h.engine.set_color(GUILD, None, Some("#ff0000")).await?;
    h.engine
        .add_pair(GUILD, None, "🔴", RED, Some("red team".to_string()))
        .await?;
    h.engine.add_pair(GUILD, None, "👑", ADMIN, None).await?;
    h.engine.display(GUILD, None, Some(CHANNEL)).await?;

    let sent = h.gateway.sent();
    let (channel, _, content) = &sent[0];
    assert_eq!(*channel, CHANNEL);
    assert_eq!(content.title.as_deref(), Some("Pick a team"));
    assert_eq!(content.color, 0xFF0000);
    // Blocked pairs are not offered.
    assert_eq!(content.lines.len(), 1);
    assert_eq!(content.lines[0].role, RED);
    assert_eq!(content.lines[0].description.as_deref(), Some("red team"));
    assert_eq!(h.gateway.reactions().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_changes_rerender_posted_menu() -> anyhow::Result<()> {
    let h = harness();
    let posted = h.full_menu(&[("🔴", RED)]).await?;

    h.engine.add_pair(GUILD, None, "🔵", BLUE, None).await?;
    let edits = h.gateway.edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].1, posted);
    assert_eq!(edits[0].2.lines.len(), 2);
    assert_eq!(h.gateway.reactions().len(), 2);

    h.engine
        .set_description(GUILD, None, Some("Choose wisely".to_string()))
        .await?;
    assert_eq!(h.gateway.edits().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_moving_channel_reposts() -> anyhow::Result<()> {
    let h = harness();
    let first = h.full_menu(&[("🔴", RED)]).await?;

    let second = h.engine.display(GUILD, None, Some(OTHER_CHANNEL)).await?;
    assert_ne!(first, second);
    assert_eq!(h.gateway.deleted(), vec![(CHANNEL, first)]);
    assert_eq!(h.gateway.sent().len(), 2);
    assert!(h.engine.lookup(first).await.is_none());
    assert!(h.engine.lookup(second).await.is_some());
    Ok(())
}

#[tokio::test]
async fn test_set_channel_discards_posted_menu() -> anyhow::Result<()> {
    let h = harness();
    let posted = h.full_menu(&[("🔴", RED)]).await?;

    h.engine.set_channel(GUILD, None, OTHER_CHANNEL).await?;
    assert_eq!(h.gateway.deleted(), vec![(CHANNEL, posted)]);
    let message = h.engine.get_message(GUILD, None).await?;
    assert_eq!(message.state(), MenuState::Undisplayed);
    assert_eq!(*message.channel(), Some(OTHER_CHANNEL));

    let reposted = h.engine.display(GUILD, None, None).await?;
    assert_eq!(h.gateway.sent()[1].0, OTHER_CHANNEL);
    assert!(h.engine.lookup(reposted).await.is_some());
    Ok(())
}

#[tokio::test]
async fn test_vanished_menu_is_reposted() -> anyhow::Result<()> {
    let h = harness();
    let posted = h.full_menu(&[("🔴", RED)]).await?;
    h.gateway.remove_message(CHANNEL, posted);

    let reposted = h.engine.display(GUILD, None, None).await?;
    assert_ne!(posted, reposted);
    assert_eq!(h.gateway.sent().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_reaction_restriction_can_be_disabled() -> anyhow::Result<()> {
    let settings = EngineSettings::default().with_restrict_reactions(false);
    let h = harness_with(settings);
    h.full_menu(&[("🔴", RED)]).await?;
    assert!(h.gateway.restricted().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_display_preconditions() -> anyhow::Result<()> {
    let h = harness();
    h.engine.create_message(GUILD, MenuKind::Full).await?;
    let err = config_error(h.engine.display(GUILD, None, Some(CHANNEL)).await);
    assert_eq!(err, ReactionRoleErrorKind::NoPairs);

    h.engine.add_pair(GUILD, None, "🔴", RED, None).await?;
    let err = config_error(h.engine.display(GUILD, None, None).await);
    assert_eq!(err, ReactionRoleErrorKind::NoChannel);
    let err = config_error(
        h.engine
            .display(GUILD, None, Some(ChannelId::new(9_999)))
            .await,
    );
    assert_eq!(err, ReactionRoleErrorKind::ChannelNotFound(9_999));

    h.engine.create_message(GUILD, MenuKind::Custom).await?;
    h.engine.add_pair(GUILD, None, "🔴", RED, None).await?;
    let err = config_error(h.engine.display(GUILD, None, None).await);
    assert_eq!(err, ReactionRoleErrorKind::NoTargetMessage);
    assert!(h.gateway.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_target_message_validation() -> anyhow::Result<()> {
    let h = harness();
    let target = MessageId::new(700);
    h.custom_menu(target, &[("🔴", RED)]).await?;
    h.engine.create_message(GUILD, MenuKind::Custom).await?;

    let err = config_error(
        h.engine
            .set_target_message(GUILD, None, CHANNEL, target)
            .await,
    );
    assert_eq!(err, ReactionRoleErrorKind::MessageAlreadyBound(700));

    let err = config_error(
        h.engine
            .set_target_message(GUILD, None, CHANNEL, MessageId::new(701))
            .await,
    );
    assert_eq!(err, ReactionRoleErrorKind::TargetMessageNotFound(701));

    let err = config_error(
        h.engine
            .set_target_message(GUILD, None, ChannelId::new(9_999), target)
            .await,
    );
    assert_eq!(err, ReactionRoleErrorKind::ChannelNotFound(9_999));

    h.engine.create_message(GUILD, MenuKind::Full).await?;
    let err = config_error(
        h.engine
            .set_target_message(GUILD, None, CHANNEL, target)
            .await,
    );
    assert_eq!(err, ReactionRoleErrorKind::WrongKind("custom"));
    Ok(())
}

#[tokio::test]
async fn test_custom_display_reattaches_reactions() -> anyhow::Result<()> {
    let h = harness();
    let target = MessageId::new(700);
    h.custom_menu(target, &[("🔴", RED), ("🔵", BLUE)]).await?;
    assert_eq!(h.gateway.reactions().len(), 2);

    let displayed = h.engine.display(GUILD, None, None).await?;
    assert_eq!(displayed, target);
    assert_eq!(h.gateway.reactions().len(), 4);
    assert!(h.gateway.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_remove_pair_clears_reaction() -> anyhow::Result<()> {
    let h = harness();
    let posted = h.full_menu(&[("🔴", RED), ("🔵", BLUE)]).await?;

    h.engine.remove_pair(GUILD, None, "🔵").await?;
    let blue = rolecall_core::Emote::parse("🔵")?;
    assert_eq!(h.gateway.cleared(), vec![(posted, blue)]);
    let live = h.engine.lookup(posted).await.expect("still displayed");
    assert_eq!(live.pairs().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_switching_to_custom_deletes_menu() -> anyhow::Result<()> {
    let h = harness();
    let posted = h.full_menu(&[("🔴", RED)]).await?;

    h.engine.set_kind(GUILD, None, MenuKind::Custom).await?;
    assert_eq!(h.gateway.deleted(), vec![(CHANNEL, posted)]);
    assert_eq!(h.engine.displayed_count().await, 0);
    let message = h.engine.get_message(GUILD, None).await?;
    assert_eq!(*message.channel(), None);
    Ok(())
}
