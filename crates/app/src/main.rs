mod dashboard;
mod logging;
mod settings;

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use dashboard::Dashboard;
use futures::StreamExt;
use tickview_chart::resampler::Resampler;
use tickview_core::common::time::RealTimeProvider;
use tickview_core::market::port::{MarketDataProvider, SeriesSource};
use tickview_core::market::watchlist::Watchlist;
use tickview_feed::replay::ReplayProvider;
use tickview_market::hub::SeriesHub;
use tickview_portfolio::valuer::PortfolioValuer;
use tracing::{info, warn};

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并把序列中心注入看板。
///
/// # Logic
/// 1. 加载配置并初始化全局日志。
/// 2. 实例化基础设施层（回放数据源、序列中心），按数据源的代码列表建立自选列表。
/// 3. 实例化领域服务（重采样器、估值器、看板）。
/// 4. 启动后台行情任务，每个新快照触发看板重算。
/// 5. 等待外部信号退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 配置与日志
    let config = settings::load(&settings::config_path())?;
    let _log_guard = logging::init(&config.log);
    info!("Tickview starting...");

    // 2. 基础设施层
    let provider = Arc::new(
        ReplayProvider::open(
            &config.market.replay_path,
            Duration::from_millis(config.market.replay_pace_ms),
        )
        .await?,
    );
    let hub = SeriesHub::new(config.market.retention);

    let available = provider.list_symbols().await?;
    let (watchlist, rejected) = Watchlist::seeded(&config.market.symbols, &available);
    if !rejected.is_empty() {
        warn!("Ignoring unknown or duplicate symbols {:?}", rejected);
    }
    if watchlist.is_empty() {
        return Err("Watchlist is empty: the feed offers none of the configured symbols".into());
    }
    info!("Watching {:?}", watchlist.symbols());

    // 3. 领域服务，配置中的周期与采样频率不匹配时直接退出
    let resampler = Resampler::from_config(&config)?;
    let valuer = PortfolioValuer::new(config.market.cadence_ms)?;
    let feed_symbols = watchlist.symbols().to_vec();
    let dashboard = Dashboard::new(
        watchlist,
        resampler,
        valuer,
        config.chart.widgets.clone(),
        config.portfolio.holdings.clone(),
        Arc::new(RealTimeProvider),
        Local,
    );

    // 4. 先订阅再启动抓取，避免丢失历史回补产生的首批快照
    let mut updates = hub.subscribe();
    let feed = hub.spawn_feed(provider, feed_symbols);
    info!(
        "Dashboard running with {} charts and {} holdings. Waiting for signals...",
        config.chart.widgets.len(),
        config.portfolio.holdings.len()
    );

    // 5. 事件循环
    loop {
        tokio::select! {
            update = updates.next() => match update {
                Some(snapshot) => {
                    dashboard.on_update(hub.as_ref(), &snapshot);
                }
                None => break,
            },
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Shutdown signal received. Exiting...");
                break;
            }
        }
    }

    feed.abort();
    Ok(())
}
