//! Serenity event handler for the reaction-role bot.
//!
//! Translates gateway events into [`EngineEvent`]s and hands them to the
//! engine. Outcomes are logged; nothing is reported back to Discord.

use crate::conversions::emote_from_reaction;
use rolecall_core::{
    ChannelId, EngineEvent, GuildId, MessageId, ReactionAction, ReactionEvent, RoleId, UserId,
};
use rolecall_engine::{EventOutcome, ReactionRoleEngine};
use serenity::all::{
    Context, EventHandler, GatewayIntents, Guild, GuildChannel, GuildMemberUpdateEvent, Member,
    Message, Reaction, Ready, Role, UnavailableGuild,
};
use serenity::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Event handler for the Rolecall Discord bot.
pub struct RolecallHandler {
    engine: Arc<ReactionRoleEngine>,
    retry_interval: Duration,
    started: AtomicBool,
}

impl RolecallHandler {
    /// Create a handler driving `engine`. Entities whose guild could not be
    /// reached are retried every `retry_interval`.
    pub fn new(engine: Arc<ReactionRoleEngine>, retry_interval: Duration) -> Self {
        Self {
            engine,
            retry_interval,
            started: AtomicBool::new(false),
        }
    }

    /// Required gateway intents for the bot.
    ///
    /// Reactions need `GUILD_MESSAGE_REACTIONS` and deletions `GUILD_MESSAGES`;
    /// member updates need the privileged `GUILD_MEMBERS` intent.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
    }

    async fn dispatch(&self, event: EngineEvent) {
        let name = event.name();
        match self.engine.handle_event(event).await {
            EventOutcome::Ignored => {}
            outcome => debug!(event = name, ?outcome, "Handled event"),
        }
    }

    async fn reaction(&self, reaction: Reaction, action: ReactionAction) {
        let (Some(guild_id), Some(user_id)) = (reaction.guild_id, reaction.user_id) else {
            return;
        };
        let Some(emote) = emote_from_reaction(&reaction.emoji) else {
            debug!(message_id = %reaction.message_id, "Ignoring unsupported reaction type");
            return;
        };

        let member_roles = reaction.member.as_ref().map(|member| {
            member
                .roles
                .iter()
                .map(|role| RoleId::new(role.get()))
                .collect()
        });

        self.dispatch(EngineEvent::Reaction(ReactionEvent {
            guild_id: GuildId::new(guild_id.get()),
            channel_id: ChannelId::new(reaction.channel_id.get()),
            message_id: MessageId::new(reaction.message_id.get()),
            user_id: UserId::new(user_id.get()),
            emote,
            action,
            member_roles,
        }))
        .await;
    }

    /// Start the periodic retry of entities that hit a transport failure.
    fn spawn_retry_loop(&self) {
        let engine = Arc::clone(&self.engine);
        let period = self.retry_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match engine.retry_pending().await {
                    Ok(report) if report == Default::default() => {}
                    Ok(report) => info!(?report, "Retried pending reaction-role messages"),
                    Err(e) => warn!(error = %e, "Retry of pending reaction-role messages failed"),
                }
            }
        });
    }
}

#[async_trait]
impl EventHandler for RolecallHandler {
    /// Called when the bot connects. The first time, rebuilds the dispatch
    /// table and starts the retry loop.
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_user = %ready.user.name,
            bot_id = %ready.user.id,
            guilds = ready.guilds.len(),
            "Bot connected to Discord"
        );

        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        match self.engine.rebuild().await {
            Ok(report) => info!(?report, "Reaction-role messages restored"),
            Err(e) => error!(error = %e, "Failed to restore reaction-role messages"),
        }
        self.spawn_retry_loop();
    }

    async fn reaction_add(&self, _ctx: Context, add_reaction: Reaction) {
        self.reaction(add_reaction, ReactionAction::Added).await;
    }

    async fn reaction_remove(&self, _ctx: Context, removed_reaction: Reaction) {
        self.reaction(removed_reaction, ReactionAction::Removed).await;
    }

    async fn message_delete(
        &self,
        _ctx: Context,
        channel_id: serenity::all::ChannelId,
        deleted_message_id: serenity::all::MessageId,
        guild_id: Option<serenity::all::GuildId>,
    ) {
        self.dispatch(EngineEvent::MessageDeleted {
            guild_id: guild_id.map(|id| GuildId::new(id.get())),
            channel_id: ChannelId::new(channel_id.get()),
            message_id: MessageId::new(deleted_message_id.get()),
        })
        .await;
    }

    async fn message_delete_bulk(
        &self,
        _ctx: Context,
        channel_id: serenity::all::ChannelId,
        multiple_deleted_messages_ids: Vec<serenity::all::MessageId>,
        guild_id: Option<serenity::all::GuildId>,
    ) {
        debug!(
            channel_id = %channel_id,
            count = multiple_deleted_messages_ids.len(),
            "Bulk message deletion"
        );
        for message_id in multiple_deleted_messages_ids {
            self.dispatch(EngineEvent::MessageDeleted {
                guild_id: guild_id.map(|id| GuildId::new(id.get())),
                channel_id: ChannelId::new(channel_id.get()),
                message_id: MessageId::new(message_id.get()),
            })
            .await;
        }
    }

    async fn channel_delete(
        &self,
        _ctx: Context,
        channel: GuildChannel,
        _messages: Option<Vec<Message>>,
    ) {
        info!(channel_id = %channel.id, guild_id = %channel.guild_id, "Channel deleted");
        self.dispatch(EngineEvent::ChannelDeleted {
            guild_id: GuildId::new(channel.guild_id.get()),
            channel_id: ChannelId::new(channel.id.get()),
        })
        .await;
    }

    async fn guild_role_delete(
        &self,
        _ctx: Context,
        guild_id: serenity::all::GuildId,
        removed_role_id: serenity::all::RoleId,
        _removed_role_data_if_available: Option<Role>,
    ) {
        info!(guild_id = %guild_id, role_id = %removed_role_id, "Role deleted");
        self.dispatch(EngineEvent::RoleDeleted {
            guild_id: GuildId::new(guild_id.get()),
            role_id: RoleId::new(removed_role_id.get()),
        })
        .await;
    }

    async fn guild_role_update(&self, _ctx: Context, old_data_if_available: Option<Role>, new: Role) {
        // Only rank changes matter; skip renames when the old role is known.
        if old_data_if_available
            .as_ref()
            .is_some_and(|old| old.position == new.position)
        {
            return;
        }
        self.dispatch(EngineEvent::RoleUpdated {
            guild_id: GuildId::new(new.guild_id.get()),
            role_id: RoleId::new(new.id.get()),
        })
        .await;
    }

    /// Called when the bot leaves a guild or a guild becomes unavailable.
    async fn guild_delete(&self, _ctx: Context, incomplete: UnavailableGuild, _full: Option<Guild>) {
        if incomplete.unavailable {
            warn!(guild_id = %incomplete.id, "Guild unavailable, keeping configuration");
            return;
        }
        info!(guild_id = %incomplete.id, "Left guild");
        self.dispatch(EngineEvent::GuildLeft {
            guild_id: GuildId::new(incomplete.id.get()),
        })
        .await;
    }

    async fn guild_member_update(
        &self,
        _ctx: Context,
        _old_if_available: Option<Member>,
        _new: Option<Member>,
        event: GuildMemberUpdateEvent,
    ) {
        self.dispatch(EngineEvent::MemberUpdated {
            guild_id: GuildId::new(event.guild_id.get()),
            user_id: UserId::new(event.user.id.get()),
        })
        .await;
    }
}
