//! Market data enrichment.
//!
//! Fills [`MarketInputs`](crate::types::MarketInputs) from a
//! [`MarketDataSource`]. Resolution order per field is live value, then the
//! loaded static value, then missing. A failed lookup degrades only that
//! field of that asset.
//!
//! A P/E band loaded with the asset is kept. Without one, the band is
//! derived from the source's P/E history with [`pe_percentiles`].

use crate::signals::pe_percentiles;
use crate::types::{AssetRecord, MarketInputs, PipelineConfig};
use rebal_traits::{MarketDataSource, SourceType, TraitError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Outcome counts for one enrichment pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentReport {
    /// Kind of source consulted.
    pub source_type: SourceType,

    /// True when no live lookups were made.
    pub offline: bool,

    /// Fields filled from the source.
    pub live: usize,

    /// Fields that kept their static value because the source had nothing.
    pub fallback: usize,

    /// Fields left missing.
    pub missing: usize,

    /// Lookups that returned an error.
    pub failures: usize,
}

impl EnrichmentReport {
    fn new(source_type: SourceType, offline: bool) -> Self {
        Self {
            source_type,
            offline,
            live: 0,
            fallback: 0,
            missing: 0,
            failures: 0,
        }
    }

    /// Total number of fields resolved (live or static).
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.live + self.fallback
    }
}

/// Enriches every asset in place and reports what was resolved.
///
/// - base-currency assets get `fx_rate = 1` without a lookup
/// - nominal-priced assets use their static price, or 1
/// - market-priced assets ask for price, 52-week range, P/E and yield, and
///   for P/E history when no band was loaded
///
/// If `config.use_live_data` is false or the source reports itself
/// unavailable, static data is kept as loaded.
pub fn enrich_assets<S>(
    assets: &mut [AssetRecord],
    source: &S,
    config: &PipelineConfig,
) -> EnrichmentReport
where
    S: MarketDataSource + ?Sized,
{
    let online = config.use_live_data && source.is_available();
    if config.use_live_data && !online {
        warn!(
            source = ?source.source_type(),
            "Market data source unavailable, using static data"
        );
    }

    let mut report = EnrichmentReport::new(source.source_type(), !online);

    for asset in assets.iter_mut() {
        enrich_asset(asset, source, config, online, &mut report);
    }

    debug!(
        live = report.live,
        fallback = report.fallback,
        missing = report.missing,
        failures = report.failures,
        "Enrichment complete"
    );
    report
}

fn enrich_asset<S>(
    asset: &mut AssetRecord,
    source: &S,
    config: &PipelineConfig,
    online: bool,
    report: &mut EnrichmentReport,
) where
    S: MarketDataSource + ?Sized,
{
    let symbol = asset.symbol.clone();

    if asset.currency == config.base_currency {
        asset.market.fx_rate = Some(Decimal::ONE);
    } else {
        let live = online.then(|| source.fx_rate(asset.currency, config.base_currency));
        asset.market.fx_rate = resolve(live, asset.market.fx_rate, &symbol, "fx_rate", report);
    }

    if !asset.uses_external_price {
        let nominal = asset.market.price.filter(|p| *p > Decimal::ZERO);
        asset.market.price = Some(nominal.unwrap_or(Decimal::ONE));
        return;
    }

    let m = &mut asset.market;
    m.price = resolve(online.then(|| source.price(&symbol)), m.price, &symbol, "price", report);
    m.high_52w = resolve(
        online.then(|| source.high_52w(&symbol)),
        m.high_52w,
        &symbol,
        "high_52w",
        report,
    );
    m.low_52w = resolve(
        online.then(|| source.low_52w(&symbol)),
        m.low_52w,
        &symbol,
        "low_52w",
        report,
    );
    m.pe_ratio = resolve(
        online.then(|| source.trailing_pe(&symbol)),
        m.pe_ratio,
        &symbol,
        "pe_ratio",
        report,
    );
    m.dividend_yield = resolve(
        online.then(|| source.trailing_dividend_yield(&symbol)),
        m.dividend_yield,
        &symbol,
        "dividend_yield",
        report,
    );

    if online && (m.pe_p25.is_none() || m.pe_p75.is_none()) {
        fill_pe_band(m, source, &symbol, report);
    }
}

/// Derives `pe_p25`/`pe_p75` from the source's P/E history.
fn fill_pe_band<S>(
    m: &mut MarketInputs,
    source: &S,
    symbol: &str,
    report: &mut EnrichmentReport,
) where
    S: MarketDataSource + ?Sized,
{
    let history = match source.pe_history(symbol) {
        Ok(Some(history)) => history,
        Ok(None) => return,
        Err(e) => {
            report.failures += 1;
            warn!(symbol, field = "pe_history", error = %e, "Market data lookup failed");
            return;
        }
    };

    match pe_percentiles(&history) {
        Some((p25, p75)) => {
            m.pe_p25 = Some(p25);
            m.pe_p75 = Some(p75);
            report.live += 2;
            debug!(symbol, observations = history.len(), p25, p75, "P/E band from history");
        }
        None => debug!(symbol, "P/E history has no usable observations"),
    }
}

/// Values a lookup may return. Non-positive or non-finite values are unusable.
trait Usable: Copy {
    fn usable(&self) -> bool;
}

impl Usable for Decimal {
    fn usable(&self) -> bool {
        *self > Decimal::ZERO
    }
}

impl Usable for f64 {
    fn usable(&self) -> bool {
        self.is_finite() && *self >= 0.0
    }
}

/// Picks live, then static, then nothing. `live` is `None` when offline.
fn resolve<T: Usable>(
    live: Option<Result<Option<T>, TraitError>>,
    fallback: Option<T>,
    symbol: &str,
    field: &'static str,
    report: &mut EnrichmentReport,
) -> Option<T> {
    let attempted = live.is_some();
    let fetched = match live {
        Some(Ok(value)) => value.filter(Usable::usable),
        Some(Err(e)) => {
            report.failures += 1;
            warn!(symbol, field, error = %e, "Market data lookup failed");
            None
        }
        None => None,
    };

    if let Some(value) = fetched {
        report.live += 1;
        return Some(value);
    }

    match fallback.filter(Usable::usable) {
        Some(value) => {
            report.fallback += 1;
            if attempted {
                debug!(symbol, field, "Using static value");
            }
            Some(value)
        }
        None => {
            report.missing += 1;
            None
        }
    }
}
