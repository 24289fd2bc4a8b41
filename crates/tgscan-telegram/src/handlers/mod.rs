//! Telegram update handlers.
//!
//! Each handler is a thin adapter: it turns the teloxide update into core
//! types and hands off to `tgscan-core` through `AppState`.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ChatMemberUpdated, Message},
};

use tgscan_core::domain::{ChatId, UserId};

use crate::{convert::membership_event, router::AppState};

pub mod commands;

pub async fn handle_my_chat_member(
    update: ChatMemberUpdated,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let event = membership_event(&update);
    if state.tracker.handle(&event).await.is_none() {
        tracing::debug!(chat_id = %event.chat_id, "membership update without status change");
    }
    Ok(())
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    if !text.starts_with('/') {
        return Ok(());
    }

    let chat_id = ChatId(msg.chat.id.0);
    let user_id = msg.from().map(|u| UserId(u.id.0 as i64));
    commands::handle_command(&state, chat_id, user_id, text).await;
    Ok(())
}
