use tgscan_core::{
    domain::{ChatId, UserId},
    membership::RegistrySnapshot,
    security::is_authorized,
    Result,
};

use crate::router::AppState;

const HELP_TEXT: &str = "Commands:
/start - say hello
/help - show this help
/links [url] - list t.me links on a page (admin)
/isgroup <url> - check whether a t.me link is a joinable group (admin)
/stats - show tracked chat counts (admin)";

const UNAUTHORIZED_TEXT: &str = "This command is restricted to bot admins.";

/// Telegram rejects messages longer than this many characters.
pub(crate) const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedCommand {
    pub name: String,
    /// The `botname` of `/cmd@botname`, if present.
    pub target: Option<String>,
    pub args: String,
}

pub(crate) fn parse_command(text: &str) -> ParsedCommand {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let args = parts.next().unwrap_or("").trim().to_string();

    let mut head = first.trim_start_matches('/').splitn(2, '@');
    let name = head.next().unwrap_or("").to_lowercase();
    let target = head
        .next()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    ParsedCommand { name, target, args }
}

/// Whether a command addressed to `target` is meant for this bot.
///
/// Untargeted commands are always ours; if our username is unknown we accept
/// everything.
fn addressed_to_us(target: Option<&str>, bot_username: Option<&str>) -> bool {
    match (target, bot_username) {
        (Some(target), Some(me)) => target.eq_ignore_ascii_case(me.trim_start_matches('@')),
        _ => true,
    }
}

/// Split `text` into chunks of at most `limit` characters, breaking on line
/// boundaries. A single line longer than `limit` is hard-split.
pub(crate) fn split_text_chunks(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut cur_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        if line_len > limit {
            if !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
                cur_len = 0;
            }
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                out.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if cur.is_empty() { line_len } else { cur_len + 1 + line_len };
        if needed > limit {
            out.push(std::mem::take(&mut cur));
            cur_len = 0;
        }
        if !cur.is_empty() {
            cur.push('\n');
            cur_len += 1;
        }
        cur.push_str(line);
        cur_len += line_len;
    }

    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

/// Dispatch a slash command. Replies are best-effort; send failures are logged.
pub async fn handle_command(
    state: &AppState,
    chat_id: ChatId,
    user_id: Option<UserId>,
    text: &str,
) {
    let ParsedCommand { name: cmd, target, args } = parse_command(text);

    if !addressed_to_us(target.as_deref(), state.bot_username.as_deref()) {
        tracing::debug!(command = %cmd, ?target, "command addressed to another bot");
        return;
    }

    let reply = match cmd.as_str() {
        "start" => Some(state.cfg.start_message.clone()),
        "help" => Some(HELP_TEXT.to_string()),
        "links" | "isgroup" | "stats" => {
            if !is_authorized(user_id, &state.cfg.telegram_admin_users) {
                tracing::warn!(?user_id, command = %cmd, "unauthorized admin command");
                Some(UNAUTHORIZED_TEXT.to_string())
            } else {
                Some(admin_command(state, &cmd, &args).await)
            }
        }
        _ => None,
    };

    let Some(reply) = reply else {
        return;
    };
    for chunk in split_text_chunks(&reply, TELEGRAM_MESSAGE_LIMIT) {
        if let Err(e) = state.messenger.send_text(chat_id, &chunk).await {
            tracing::warn!(chat_id = %chat_id, command = %cmd, "reply failed: {e}");
            return;
        }
    }
}

async fn admin_command(state: &AppState, cmd: &str, args: &str) -> String {
    match cmd {
        "links" => {
            let url = if args.is_empty() {
                state.cfg.scan_page_url.clone()
            } else {
                Some(args.to_string())
            };
            let Some(url) = url else {
                return "Usage: /links <url> (no SCAN_PAGE_URL configured)".to_string();
            };
            links_reply(state.scanner.extract_group_links(&url).await)
        }
        "isgroup" => {
            if args.is_empty() {
                return "Usage: /isgroup <url>".to_string();
            }
            isgroup_reply(args, state.scanner.is_group_link(args).await)
        }
        _ => stats_reply(&state.tracker.registry().snapshot().await),
    }
}

fn links_reply(result: Result<Vec<String>>) -> String {
    match result {
        Ok(links) if links.is_empty() => "No Telegram links found.".to_string(),
        Ok(links) => links.join("\n"),
        Err(e) => {
            tracing::warn!("link scan failed: {e}");
            format!("Scan failed: {e}")
        }
    }
}

fn isgroup_reply(link: &str, result: Result<bool>) -> String {
    match result {
        Ok(true) => format!("{link} is a group"),
        Ok(false) => format!("{link} is not a group"),
        Err(e) => {
            tracing::warn!("link check failed: {e}");
            format!("Check failed: {e}")
        }
    }
}

fn stats_reply(snap: &RegistrySnapshot) -> String {
    format!(
        "Private chats: {}\nGroups: {}\nChannels: {}",
        snap.user_ids.len(),
        snap.group_ids.len(),
        snap.channel_ids.len()
    )
}
