//! Strike selection, synthetic premium and annualized-return heuristics.
//!
//! These are placeholder formulas for screening covered-call and
//! cash-secured-put candidates, not a pricing model. All rounding is
//! half-to-even, so a target exactly between two strikes resolves to the
//! even multiple of the interval (22425 / 50 = 448.5 -> 448 -> 22400).

use crate::config::AnalysisConfig;
use crate::model::{AnalysisRow, OptionType, SymbolRecord};

/// Fraction of strike assumed blocked as margin when writing an option.
pub const MARGIN_FRACTION: f64 = 0.15;
/// Time-value proxy added to in-the-money premiums, as a fraction of spot.
pub const ITM_TIME_VALUE: f64 = 0.02;
/// Flat premium for out-of-the-money options, as a fraction of spot.
pub const OTM_PREMIUM: f64 = 0.01;

/// Round to `decimals` places, ties to even.
///
/// Rounds the exact binary value, so 1.115 (stored as 1.11499..) gives 1.11.
/// Scaling by a power of ten first would manufacture a tie there.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    format!("{:.*}", decimals as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Position of `current` inside `[low, high]` as a percentage.
///
/// Not clamped: prices outside the range give values below 0 or above 100.
/// A zero-width range returns 50.
pub fn percentile_within_range(current: f64, high: f64, low: f64) -> f64 {
    if high == low {
        return 50.0;
    }
    (current - low) / (high - low) * 100.0
}

/// Nearest multiple of `interval`.
pub fn nearest_strike(price: f64, interval: f64) -> f64 {
    (price / interval).round_ties_even() * interval
}

/// Strike `margin_percent` away from the at-the-money strike: below spot for
/// calls, above spot for puts.
pub fn strike_with_margin(
    spot: f64,
    margin_percent: f64,
    option_type: OptionType,
    interval: f64,
) -> f64 {
    let base = nearest_strike(spot, interval);
    let target = match option_type {
        OptionType::Call => base * (1.0 - margin_percent / 100.0),
        OptionType::Put => base * (1.0 + margin_percent / 100.0),
    };
    nearest_strike(target, interval)
}

/// Intrinsic value plus 2% of spot when in the money, 1% of spot otherwise.
pub fn synthetic_premium(spot: f64, strike: f64, option_type: OptionType) -> f64 {
    let premium = match option_type {
        OptionType::Call if spot > strike => (spot - strike) + spot * ITM_TIME_VALUE,
        OptionType::Put if spot < strike => (strike - spot) + spot * ITM_TIME_VALUE,
        _ => spot * OTM_PREMIUM,
    };
    round_to(premium, 2)
}

/// Premium over blocked margin, annualized linearly.
pub fn annualized_return(premium: f64, strike: f64, days_to_expiry: u32) -> f64 {
    let margin_required = strike * MARGIN_FRACTION;
    if margin_required == 0.0 {
        return 0.0;
    }
    let irr = (premium / margin_required) * (365.0 / days_to_expiry as f64) * 100.0;
    round_to(irr, 2)
}

pub fn analyze_record(record: &SymbolRecord, config: &AnalysisConfig) -> AnalysisRow {
    let spot = record.spot_price;
    let percentile = percentile_within_range(spot, record.high_52w, record.low_52w);

    let leg = |option_type| {
        let strike = strike_with_margin(
            spot,
            config.margin_percent,
            option_type,
            config.strike_interval,
        );
        let premium = synthetic_premium(spot, strike, option_type);
        let irr = annualized_return(premium, strike, config.days_to_expiry);
        (strike, premium, irr)
    };
    let (ce_strike, ce_premium, ce_irr) = leg(OptionType::Call);
    let (pe_strike, pe_premium, pe_irr) = leg(OptionType::Put);

    AnalysisRow {
        symbol: record.symbol.clone(),
        spot_price: spot,
        high_52w: record.high_52w,
        low_52w: record.low_52w,
        percentile: round_to(percentile, 2),
        adjusted_lot_size: record.lot_size as f64 * config.lot_multiplier,
        ce_strike,
        ce_premium,
        ce_irr,
        pe_strike,
        pe_premium,
        pe_irr,
        margin_percent_used: config.margin_percent,
    }
}

/// Analyze every record, preserving input order.
pub fn analyze(records: &[SymbolRecord], config: &AnalysisConfig) -> Vec<AnalysisRow> {
    records.iter().map(|r| analyze_record(r, config)).collect()
}
