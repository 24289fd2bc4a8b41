//! Chat-membership tracking.
//!
//! The registry holds three independent sets of chat ids (private users,
//! groups, channels). It is created empty at startup and lives for the
//! process lifetime; nothing is persisted.

use std::{collections::HashSet, sync::Arc};

use tokio::sync::Mutex;

use crate::domain::{ChatId, ChatKind, ChatMembershipEvent, Transition};

#[derive(Debug, Default)]
struct Sets {
    user_ids: HashSet<ChatId>,
    group_ids: HashSet<ChatId>,
    channel_ids: HashSet<ChatId>,
}

impl Sets {
    fn for_kind(&mut self, kind: ChatKind) -> &mut HashSet<ChatId> {
        match kind {
            ChatKind::Private => &mut self.user_ids,
            ChatKind::GroupOrSupergroup => &mut self.group_ids,
            ChatKind::Channel => &mut self.channel_ids,
        }
    }
}

/// Sorted copy of the registry contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub user_ids: Vec<ChatId>,
    pub group_ids: Vec<ChatId>,
    pub channel_ids: Vec<ChatId>,
}

fn sorted(set: &HashSet<ChatId>) -> Vec<ChatId> {
    let mut out: Vec<ChatId> = set.iter().copied().collect();
    out.sort();
    out
}

/// Process-lifetime membership state.
///
/// One lock guards all three sets, so each insert/remove is linearized.
#[derive(Debug, Default)]
pub struct MembershipRegistry {
    inner: Mutex<Sets>,
}

impl MembershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id was not already present.
    pub async fn insert(&self, kind: ChatKind, chat_id: ChatId) -> bool {
        self.inner.lock().await.for_kind(kind).insert(chat_id)
    }

    /// Returns `true` if the id was present.
    pub async fn remove(&self, kind: ChatKind, chat_id: ChatId) -> bool {
        self.inner.lock().await.for_kind(kind).remove(&chat_id)
    }

    pub async fn contains(&self, kind: ChatKind, chat_id: ChatId) -> bool {
        self.inner.lock().await.for_kind(kind).contains(&chat_id)
    }

    pub async fn snapshot(&self) -> RegistrySnapshot {
        let sets = self.inner.lock().await;
        RegistrySnapshot {
            user_ids: sorted(&sets.user_ids),
            group_ids: sorted(&sets.group_ids),
            channel_ids: sorted(&sets.channel_ids),
        }
    }
}

/// Derive the membership signal for an event.
///
/// `None` means the status did not change and there is nothing to do.
pub fn classify_transition(event: &ChatMembershipEvent) -> Option<Transition> {
    if event.previous_status == event.new_status {
        return None;
    }

    Some(Transition {
        was_member: event
            .previous_status
            .counts_as_member(event.previous_is_member),
        is_member: event.new_status.counts_as_member(event.new_is_member),
    })
}

/// Applies membership transitions to a shared [`MembershipRegistry`].
#[derive(Clone, Debug)]
pub struct MembershipTracker {
    registry: Arc<MembershipRegistry>,
}

impl MembershipTracker {
    pub fn new(registry: Arc<MembershipRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<MembershipRegistry> {
        &self.registry
    }

    /// Classify `event` and apply the result. Returns the transition, if any.
    pub async fn handle(&self, event: &ChatMembershipEvent) -> Option<Transition> {
        let transition = classify_transition(event)?;
        self.apply_transition(event, transition).await;
        Some(transition)
    }

    pub async fn apply_transition(&self, event: &ChatMembershipEvent, transition: Transition) {
        let kind = event.chat_kind;
        let chat_id = event.chat_id;

        if transition.joined() {
            self.registry.insert(kind, chat_id).await;
            match kind {
                ChatKind::Private => tracing::info!(
                    actor = %event.actor_name,
                    chat_id = %chat_id,
                    "{} started the bot",
                    event.actor_name
                ),
                _ => tracing::info!(
                    actor = %event.actor_name,
                    chat_id = %chat_id,
                    kind = kind.as_str(),
                    "{} added the bot to {} {}",
                    event.actor_name,
                    kind.as_str(),
                    chat_id
                ),
            }
        } else if transition.left() {
            self.registry.remove(kind, chat_id).await;
            match kind {
                ChatKind::Private => tracing::info!(
                    actor = %event.actor_name,
                    chat_id = %chat_id,
                    "{} blocked the bot",
                    event.actor_name
                ),
                _ => tracing::info!(
                    actor = %event.actor_name,
                    chat_id = %chat_id,
                    kind = kind.as_str(),
                    "{} removed the bot from {} {}",
                    event.actor_name,
                    kind.as_str(),
                    chat_id
                ),
            }
        }
    }
}
