//! Telegram update → core event conversion.
//!
//! Everything the tracker needs is pulled out of the teloxide types here, so
//! the core never sees optional or loosely-typed fields.

use teloxide::types::{Chat, ChatMemberKind, ChatMemberUpdated};

use tgscan_core::domain::{ChatId, ChatKind, ChatMembershipEvent, MemberStatus};

pub fn chat_kind(chat: &Chat) -> ChatKind {
    if chat.is_private() {
        ChatKind::Private
    } else if chat.is_group() || chat.is_supergroup() {
        ChatKind::GroupOrSupergroup
    } else {
        ChatKind::Channel
    }
}

/// Status plus the `is_member` flag (only meaningful for restricted members).
pub fn member_status(kind: &ChatMemberKind) -> (MemberStatus, Option<bool>) {
    match kind {
        ChatMemberKind::Owner(_) => (MemberStatus::Creator, None),
        ChatMemberKind::Administrator(_) => (MemberStatus::Admin, None),
        ChatMemberKind::Member => (MemberStatus::Member, None),
        ChatMemberKind::Restricted(r) => (MemberStatus::Restricted, Some(r.is_member)),
        ChatMemberKind::Left => (MemberStatus::Left, None),
        ChatMemberKind::Banned(_) => (MemberStatus::Banned, None),
    }
}

pub fn membership_event(update: &ChatMemberUpdated) -> ChatMembershipEvent {
    let (previous_status, previous_is_member) = member_status(&update.old_chat_member.kind);
    let (new_status, new_is_member) = member_status(&update.new_chat_member.kind);

    ChatMembershipEvent {
        chat_id: ChatId(update.chat.id.0),
        chat_kind: chat_kind(&update.chat),
        actor_name: update.from.full_name(),
        previous_status,
        previous_is_member,
        new_status,
        new_is_member,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn user(id: i64, first: &str, last: Option<&str>, is_bot: bool) -> Value {
        let mut u = json!({ "id": id, "is_bot": is_bot, "first_name": first });
        if let Some(last) = last {
            u["last_name"] = json!(last);
        }
        u
    }

    fn bot_user() -> Value {
        let mut u = user(999, "tgscan", None, true);
        u["username"] = json!("tgscan_bot");
        u
    }

    fn member(status: &str) -> Value {
        let mut m = json!({ "user": bot_user(), "status": status });
        let extra = match status {
            "creator" => json!({ "is_anonymous": false, "custom_title": "boss" }),
            "administrator" => json!({
                "can_be_edited": false,
                "is_anonymous": false,
                "can_manage_chat": true,
                "can_delete_messages": true,
                "can_manage_video_chats": false,
                "can_restrict_members": false,
                "can_promote_members": false,
                "can_change_info": false,
                "can_invite_users": true,
                "can_post_messages": false,
                "can_edit_messages": false,
                "can_pin_messages": false,
                "can_manage_topics": false
            }),
            "kicked" => json!({ "until_date": 0 }),
            _ => json!({}),
        };
        if let (Some(m), Some(extra)) = (m.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                m.insert(k.clone(), v.clone());
            }
        }
        m
    }

    fn restricted(is_member: bool) -> Value {
        json!({
            "user": bot_user(),
            "status": "restricted",
            "until_date": 0,
            "is_member": is_member,
            "can_send_messages": false,
            "can_send_media_messages": false,
            "can_send_audios": false,
            "can_send_documents": false,
            "can_send_photos": false,
            "can_send_videos": false,
            "can_send_video_notes": false,
            "can_send_voice_notes": false,
            "can_send_polls": false,
            "can_send_other_messages": false,
            "can_add_web_page_previews": false,
            "can_change_info": false,
            "can_invite_users": false,
            "can_pin_messages": false,
            "can_manage_topics": false
        })
    }

    fn supergroup() -> Value {
        json!({ "id": -1001234, "type": "supergroup", "title": "Links" })
    }

    fn update(chat: Value, old: Value, new: Value) -> ChatMemberUpdated {
        serde_json::from_value(json!({
            "chat": chat,
            "from": user(42, "Ada", Some("Lovelace"), false),
            "date": 1_700_000_000,
            "old_chat_member": old,
            "new_chat_member": new
        }))
        .unwrap()
    }

    #[test]
    fn plain_kinds_map_without_flag() {
        assert_eq!(
            member_status(&ChatMemberKind::Member),
            (MemberStatus::Member, None)
        );
        assert_eq!(
            member_status(&ChatMemberKind::Left),
            (MemberStatus::Left, None)
        );
    }

    #[test]
    fn bot_added_to_supergroup_becomes_event() {
        let ev = membership_event(&update(supergroup(), member("left"), member("member")));
        assert_eq!(
            ev,
            ChatMembershipEvent {
                chat_id: ChatId(-1001234),
                chat_kind: ChatKind::GroupOrSupergroup,
                actor_name: "Ada Lovelace".to_string(),
                previous_status: MemberStatus::Left,
                previous_is_member: None,
                new_status: MemberStatus::Member,
                new_is_member: None,
            }
        );
    }

    #[test]
    fn owner_admin_and_banned_map_to_core_statuses() {
        let ev = membership_event(&update(supergroup(), member("creator"), member("administrator")));
        assert_eq!(ev.previous_status, MemberStatus::Creator);
        assert_eq!(ev.new_status, MemberStatus::Admin);

        let ev = membership_event(&update(supergroup(), member("administrator"), member("kicked")));
        assert_eq!(ev.new_status, MemberStatus::Banned);
        assert_eq!(ev.new_is_member, None);
    }

    #[test]
    fn restricted_carries_is_member_flag() {
        let ev = membership_event(&update(supergroup(), member("member"), restricted(true)));
        assert_eq!(ev.new_status, MemberStatus::Restricted);
        assert_eq!(ev.new_is_member, Some(true));

        let ev = membership_event(&update(supergroup(), restricted(false), member("left")));
        assert_eq!(ev.previous_status, MemberStatus::Restricted);
        assert_eq!(ev.previous_is_member, Some(false));
    }

    #[test]
    fn chat_types_map_to_kinds() {
        let private = json!({ "id": 42, "type": "private", "first_name": "Ada" });
        let group = json!({ "id": -77, "type": "group", "title": "Small" });
        let channel = json!({ "id": -1005555, "type": "channel", "title": "News" });

        let kinds: Vec<ChatKind> = [private, group, supergroup(), channel]
            .into_iter()
            .map(|chat| membership_event(&update(chat, member("left"), member("member"))).chat_kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ChatKind::Private,
                ChatKind::GroupOrSupergroup,
                ChatKind::GroupOrSupergroup,
                ChatKind::Channel,
            ]
        );
    }

    #[test]
    fn actor_without_last_name_uses_first_name() {
        let mut raw = json!({
            "chat": supergroup(),
            "from": user(7, "Grace", None, false),
            "date": 1_700_000_000,
            "old_chat_member": member("member"),
            "new_chat_member": member("left")
        });
        raw["chat"]["id"] = json!(-1009);
        let upd: ChatMemberUpdated = serde_json::from_value(raw).unwrap();

        let ev = membership_event(&upd);
        assert_eq!(ev.actor_name, "Grace");
        assert_eq!(ev.chat_id, ChatId(-1009));
    }
}
