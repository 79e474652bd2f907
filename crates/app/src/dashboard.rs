use chrono::TimeZone;
use rust_decimal::Decimal;
use std::sync::Arc;
use tickview_chart::resampler::Resampler;
use tickview_chart::view::render;
use tickview_core::chart::entity::{ChartSpec, ChartView, ResampledSeries};
use tickview_core::common::time::TimeProvider;
use tickview_core::market::entity::SeriesSnapshot;
use tickview_core::market::port::SeriesSource;
use tickview_core::market::watchlist::Watchlist;
use tickview_core::portfolio::entity::{Holding, PortfolioValuation};
use tickview_portfolio::valuer::PortfolioValuer;
use tracing::{debug, info, warn};

/// 一次快照更新触发的重算结果
#[derive(Debug, Default)]
pub struct DashboardUpdate {
    pub charts: Vec<ChartView>,
    pub portfolio: Option<PortfolioValuation>,
}

/// # Summary
/// 看板：持有全部图表组件与持仓，在行情更新时重算受影响的部分。
///
/// # Invariants
/// - 当前时间只从注入的 `TimeProvider` 读取。
/// - 只响应自选列表中证券的更新。
pub struct Dashboard<Tz: TimeZone> {
    watchlist: Watchlist,
    resampler: Resampler,
    valuer: PortfolioValuer,
    widgets: Vec<ChartSpec>,
    holdings: Vec<Holding>,
    clock: Arc<dyn TimeProvider>,
    tz: Tz,
}

impl<Tz: TimeZone> Dashboard<Tz> {
    pub fn new(
        watchlist: Watchlist,
        resampler: Resampler,
        valuer: PortfolioValuer,
        widgets: Vec<ChartSpec>,
        holdings: Vec<Holding>,
        clock: Arc<dyn TimeProvider>,
        tz: Tz,
    ) -> Self {
        for symbol in widgets.iter().flat_map(|w| w.symbols.iter()) {
            if !watchlist.contains(symbol) {
                warn!("Chart symbol {} is not on the watchlist and will stay empty", symbol);
            }
        }
        Self {
            watchlist,
            resampler,
            valuer,
            widgets,
            holdings,
            clock,
            tz,
        }
    }

    /// # Summary
    /// 处理某个证券的新快照。
    ///
    /// # Logic
    /// 1. 不在自选列表中的证券直接忽略。
    /// 2. 重绘所有包含该证券的图表组件。
    /// 3. 该证券在持仓中时重新估值整个组合。
    pub fn on_update(&self, source: &dyn SeriesSource, snapshot: &SeriesSnapshot) -> DashboardUpdate {
        let symbol = snapshot.symbol.as_str();
        if !self.watchlist.contains(symbol) {
            debug!("Ignoring update for unwatched {}", symbol);
            return DashboardUpdate::default();
        }
        let charts = self
            .widgets
            .iter()
            .filter(|w| w.symbols.iter().any(|s| s == symbol))
            .filter_map(|w| self.render_widget(source, w))
            .collect();

        let portfolio = if self.holdings.iter().any(|h| h.symbol == symbol) {
            self.refresh_portfolio(source)
        } else {
            None
        };

        DashboardUpdate { charts, portfolio }
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    /// 取消跟踪某个证券，之后其更新不再触发重算
    pub fn unwatch(&mut self, symbol: &str) -> bool {
        let removed = self.watchlist.remove(symbol);
        if removed {
            info!("{} removed from watchlist", symbol);
        }
        removed
    }

    pub fn refresh_portfolio(&self, source: &dyn SeriesSource) -> Option<PortfolioValuation> {
        if self.holdings.is_empty() {
            return None;
        }
        match self.valuer.value(&self.holdings, source) {
            Ok(valuation) => {
                info!(
                    "Portfolio value {} ({} today, {}%)",
                    valuation.total_current_value.round_dp(2),
                    valuation.total_gain_loss.round_dp(2),
                    (valuation.total_percent_change * Decimal::ONE_HUNDRED)
                        .round_dp(2)
                );
                Some(valuation)
            }
            Err(e) => {
                warn!("Portfolio valuation failed: {}", e);
                None
            }
        }
    }

    fn render_widget(&self, source: &dyn SeriesSource, spec: &ChartSpec) -> Option<ChartView> {
        match render(&self.resampler, source, spec, self.clock.now(), &self.tz) {
            Ok(view) => {
                info!("{}", summarize(&view));
                Some(view)
            }
            Err(e) => {
                warn!("Chart '{}' not rendered: {}", spec.title().replace('\n', " / "), e);
                None
            }
        }
    }
}

/// 单行图表摘要，用于日志
fn summarize(view: &ChartView) -> String {
    let parts: Vec<String> = view
        .series
        .iter()
        .map(|s| match &s.series {
            ResampledSeries::Candles(candles) => match candles.last() {
                Some(c) => format!("{} {} candles, last close {:.2}", s.symbol, candles.len(), c.close),
                None => format!("{} no candles", s.symbol),
            },
            ResampledSeries::Line(points) => match points.last() {
                Some(p) => format!("{} {} points, last {:.2}", s.symbol, points.len(), p.value),
                None => format!("{} no points", s.symbol),
            },
        })
        .collect();
    format!("[{}] {}", view.title.replace('\n', " / "), parts.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use tickview_core::chart::entity::{BoundaryMode, ChartMode, WindowRequest};
    use tickview_core::common::time::FakeClockProvider;
    use tickview_core::common::{BucketInterval, RangePreset};
    use tickview_core::market::mock::{StaticSource, synthetic_series};

    fn setup() -> (Dashboard<Utc>, StaticSource) {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let source = StaticSource::new()
            .with_series("AAPL", synthetic_series(start, 1441, 60_000))
            .with_series("MSFT", synthetic_series(start, 1441, 60_000));
        let widgets = vec![
            ChartSpec {
                symbols: vec!["AAPL".to_string()],
                window: WindowRequest::relative(RangePreset::Last24Hours),
                interval: BucketInterval::Hour1,
            },
            ChartSpec {
                symbols: vec!["MSFT".to_string(), "AAPL".to_string()],
                window: WindowRequest::relative(RangePreset::Last24Hours),
                interval: BucketInterval::Minute15,
            },
        ];
        let holdings = vec![Holding {
            symbol: "MSFT".to_string(),
            units: dec!(3),
        }];
        let clock = Arc::new(FakeClockProvider::new(start + Duration::days(1)));
        let available = vec!["AAPL".to_string(), "MSFT".to_string(), "NVDA".to_string()];
        let (watchlist, _) = Watchlist::seeded(&["AAPL".to_string(), "MSFT".to_string()], &available);
        let dashboard = Dashboard::new(
            watchlist,
            Resampler::new(60_000, BoundaryMode::HalfOpen).unwrap(),
            PortfolioValuer::new(60_000).unwrap(),
            widgets,
            holdings,
            clock,
            Utc,
        );
        (dashboard, source)
    }

    #[test]
    fn test_update_redraws_affected_widgets_only() {
        let (dashboard, source) = setup();

        let update = dashboard.on_update(&source, &source.snapshot("AAPL").unwrap());
        assert_eq!(update.charts.len(), 2);
        assert_eq!(update.charts[0].mode, ChartMode::Candle);
        assert_eq!(update.charts[1].mode, ChartMode::Line);
        // AAPL 不在持仓中
        assert!(update.portfolio.is_none());

        let update = dashboard.on_update(&source, &source.snapshot("MSFT").unwrap());
        assert_eq!(update.charts.len(), 1);
        assert_eq!(update.charts[0].series.len(), 2);
        assert!(update.portfolio.is_some());
    }

    #[test]
    fn test_overlay_without_partner_data_still_renders() {
        let (dashboard, _) = setup();
        let partial = StaticSource::new().with_series(
            "MSFT",
            synthetic_series(Utc.with_ymd_and_hms(2026, 3, 2, 22, 0, 0).unwrap(), 120, 60_000),
        );
        let update = dashboard.on_update(&partial, &partial.snapshot("MSFT").unwrap());
        // AAPL 无数据，叠加图只剩 MSFT
        assert_eq!(update.charts.len(), 1);
        assert_eq!(update.charts[0].series.len(), 1);
        assert_eq!(update.charts[0].series[0].symbol, "MSFT");
        assert_eq!(update.charts[0].series[0].series.len(), 8);
    }

    #[test]
    fn test_portfolio_valuation_of_holdings() {
        let (dashboard, source) = setup();
        let valuation = dashboard.refresh_portfolio(&source).unwrap();
        assert_eq!(valuation.holdings.len(), 1);
        assert_eq!(valuation.holdings[0].units, dec!(3));
        assert!(valuation.missing.is_empty());
    }

    #[test]
    fn test_unwatched_symbol_is_ignored() {
        let (mut dashboard, source) = setup();
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let nvda = StaticSource::new().with_series("NVDA", synthetic_series(start, 1441, 60_000));
        let update = dashboard.on_update(&nvda, &nvda.snapshot("NVDA").unwrap());
        assert!(update.charts.is_empty());
        assert!(update.portfolio.is_none());

        assert!(dashboard.unwatch("MSFT"));
        assert!(!dashboard.unwatch("MSFT"));
        assert_eq!(dashboard.watchlist().symbols(), ["AAPL"]);
        let update = dashboard.on_update(&source, &source.snapshot("MSFT").unwrap());
        assert!(update.charts.is_empty());
        assert!(update.portfolio.is_none());
    }

    #[test]
    fn test_summary_mentions_every_series() {
        let (dashboard, source) = setup();
        let update = dashboard.on_update(&source, &source.snapshot("AAPL").unwrap());
        let summary = summarize(&update.charts[1]);
        assert!(summary.contains("MSFT"));
        assert!(summary.contains("AAPL"));
        assert!(!summary.contains('\n'));
    }
}
