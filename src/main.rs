use std::time::Duration;

use dotenv::dotenv;
use reqwest::Client;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use dex_sync::app_config::db::init_db;
use dex_sync::app_config::env::{env_i64_or_default, env_is_true, env_or_default};
use dex_sync::app_config::log::setup_logging;
use dex_sync::dex::store::DbDexStore;
use dex_sync::dex::task::{ActionHistoryJob, NewDexPriceJob, WhaleExPriceJob};
use dex_sync::node::NodeApiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    setup_logging()?;
    let db = init_db().await;

    // 所有对外请求共用一个显式构造的 client
    let http = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let mut handles = Vec::new();

    // action 重放任务
    if env_is_true("IS_RUN_ACTION_JOB", true) {
        let fetcher = NodeApiClient::new(
            http.clone(),
            env_or_default("NODE_API_URL", "https://eos.greymass.com"),
        );
        let job = ActionHistoryJob::new(
            fetcher,
            DbDexStore::new(db.clone()),
            env_or_default("DEX_ACCOUNT", "kyubeydex.bp"),
            env_i64_or_default("DEX_START_POSITION", 0),
        );
        let period = Duration::from_secs(env_i64_or_default("ACTION_JOB_INTERVAL_SEC", 5) as u64);
        handles.push(tokio::spawn(async move {
            // tick 内顺序 await，上一轮没跑完时错过的 tick 直接跳过
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if let Err(e) = job.run_once().await {
                    error!("action history job aborted: {}", e);
                }
            }
        }));
    }

    // 第三方价格源任务
    if env_is_true("IS_RUN_PRICE_JOBS", true) {
        let job = NewDexPriceJob::new(
            http.clone(),
            env_or_default("NEWDEX_BASE_URL", "https://newdex.io"),
        );
        let store = DbDexStore::new(db.clone());
        let period =
            Duration::from_secs(env_i64_or_default("NEWDEX_JOB_INTERVAL_SEC", 300) as u64);
        handles.push(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if let Err(e) = job.run_once(&store).await {
                    error!("newdex price job aborted: {}", e);
                }
            }
        }));

        let job = WhaleExPriceJob::new(
            http.clone(),
            env_or_default("WHALEEX_BASE_URL", "https://www.whaleex.com"),
        );
        let store = DbDexStore::new(db.clone());
        let period =
            Duration::from_secs(env_i64_or_default("WHALEEX_JOB_INTERVAL_SEC", 60) as u64);
        handles.push(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if let Err(e) = job.run_once(&store).await {
                    error!("whaleex price job aborted: {}", e);
                }
            }
        }));
    }

    info!("dex_sync is running, {} jobs scheduled", handles.len());
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    for handle in &handles {
        handle.abort();
    }
    Ok(())
}
