use std::fmt;

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric). Negative for groups and channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which registry set a chat belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChatKind {
    Private,
    GroupOrSupergroup,
    Channel,
}

impl ChatKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatKind::Private => "private",
            ChatKind::GroupOrSupergroup => "group",
            ChatKind::Channel => "channel",
        }
    }
}

/// Membership status of the bot in a chat, as reported by the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberStatus {
    None,
    Member,
    Admin,
    Creator,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    /// Whether this status counts as "present in the chat".
    ///
    /// `Restricted` is ambiguous; `is_member` decides, and a missing flag
    /// counts as not present.
    pub fn counts_as_member(self, is_member: Option<bool>) -> bool {
        match self {
            MemberStatus::Member | MemberStatus::Admin | MemberStatus::Creator => true,
            MemberStatus::Restricted => is_member == Some(true),
            MemberStatus::None | MemberStatus::Left | MemberStatus::Banned => false,
        }
    }
}

/// A single "old member info vs new member info" update for one chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMembershipEvent {
    pub chat_id: ChatId,
    pub chat_kind: ChatKind,
    pub actor_name: String,
    pub previous_status: MemberStatus,
    pub previous_is_member: Option<bool>,
    pub new_status: MemberStatus,
    pub new_is_member: Option<bool>,
}

/// Boolean membership signal derived from a [`ChatMembershipEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub was_member: bool,
    pub is_member: bool,
}

impl Transition {
    pub fn joined(self) -> bool {
        !self.was_member && self.is_member
    }

    pub fn left(self) -> bool {
        self.was_member && !self.is_member
    }
}
