use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tgscan_core::{
    config::Config,
    links::LinkScanner,
    membership::{MembershipRegistry, MembershipTracker},
    ports::{MessagingPort, PageFetcher},
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub tracker: MembershipTracker,
    pub scanner: LinkScanner,
    pub messenger: Arc<dyn MessagingPort>,
    /// Our `@username`, used to ignore `/cmd@other_bot` in groups.
    pub bot_username: Option<String>,
}

impl AppState {
    pub fn new(
        cfg: Arc<Config>,
        registry: Arc<MembershipRegistry>,
        fetcher: Arc<dyn PageFetcher>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            cfg,
            tracker: MembershipTracker::new(registry),
            scanner: LinkScanner::new(fetcher),
            messenger,
            bot_username: None,
        }
    }

    pub fn with_bot_username(mut self, username: Option<String>) -> Self {
        self.bot_username = username;
        self
    }
}

pub async fn run_polling(
    cfg: Arc<Config>,
    registry: Arc<MembershipRegistry>,
    fetcher: Arc<dyn PageFetcher>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    let bot_username = match bot.get_me().await {
        Ok(me) => {
            let username = me.user.username.clone();
            tracing::info!("tgscan started: @{}", username.as_deref().unwrap_or("?"));
            username
        }
        Err(e) => {
            tracing::warn!("get_me failed, continuing anyway: {e}");
            None
        }
    };
    tracing::info!(
        admins = cfg.telegram_admin_users.len(),
        scan_page = cfg.scan_page_url.as_deref().unwrap_or("-"),
        "configuration loaded"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let state = Arc::new(
        AppState::new(cfg, registry, fetcher, messenger).with_bot_username(bot_username),
    );

    let handler = dptree::entry()
        .branch(Update::filter_my_chat_member().endpoint(handlers::handle_my_chat_member))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("dispatcher stopped");
    Ok(())
}
