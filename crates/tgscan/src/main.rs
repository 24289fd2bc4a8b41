use std::sync::Arc;

use tgscan_core::{config::Config, membership::MembershipRegistry, ports::PageFetcher};
use tgscan_http::HttpPageFetcher;

#[tokio::main]
async fn main() -> Result<(), tgscan_core::Error> {
    tgscan_core::logging::init("tgscan")?;

    let cfg = Arc::new(Config::load()?);

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(cfg.fetch_timeout)?);
    let registry = Arc::new(MembershipRegistry::new());

    tgscan_telegram::router::run_polling(cfg, registry, fetcher)
        .await
        .map_err(|e| tgscan_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
