//! Per-dimension risk scorers.
//!
//! Every function here is pure: history and the current date go in, a
//! [`FactorScore`] comes out. Higher means riskier.

use super::score_types::FactorScore;
use crate::config::{
    CountryRiskTable, CountryTier, FinancialThresholds, QualityThresholds, StockoutThresholds,
};
use crate::core::{Address, PartHistory, PurchaseOrderLine};
use chrono::NaiveDate;

/// Days-on-hand reported for parts with no measurable turnover.
pub const SLOW_MOVING_DAYS: f64 = 999.0;

const DAYS_PER_YEAR: f64 = 365.0;

/// First day of a trailing window of `window_days` ending on `today`.
pub fn window_start(today: NaiveDate, window_days: u32) -> NaiveDate {
    today - chrono::Duration::days(i64::from(window_days))
}

/// Value still owed across all lines that are not fully received.
pub fn open_order_exposure(lines: &[PurchaseOrderLine]) -> f64 {
    lines.iter().map(PurchaseOrderLine::open_value).sum()
}

/// Base 50, raised by open-order exposure.
pub fn financial_score(lines: &[PurchaseOrderLine], thresholds: &FinancialThresholds) -> FactorScore {
    let exposure = open_order_exposure(lines);
    let score = if exposure > thresholds.high_exposure {
        70
    } else if exposure > thresholds.elevated_exposure {
        60
    } else {
        50
    };
    FactorScore::from_const(score)
}

/// Share of completed deliveries in the window that arrived late.
///
/// No completed deliveries in the window gives [`FactorScore::NEUTRAL`].
pub fn delivery_score(lines: &[PurchaseOrderLine], window_start: NaiveDate) -> FactorScore {
    let (completed, late) = lines
        .iter()
        .filter(|line| line.ordered_on_or_after(window_start) && line.is_completed())
        .fold((0usize, 0usize), |(completed, late), line| {
            (completed + 1, late + usize::from(line.is_late()))
        });

    if completed == 0 {
        return FactorScore::NEUTRAL;
    }
    FactorScore::saturating(late as f64 / completed as f64 * 100.0)
}

/// Placeholder heuristic on catalogue breadth until defect data exists.
pub fn quality_score(parts_supplied: usize, thresholds: &QualityThresholds) -> FactorScore {
    let score = if parts_supplied > thresholds.large_part_count {
        70
    } else if parts_supplied > thresholds.moderate_part_count {
        60
    } else {
        50
    };
    FactorScore::from_const(score)
}

pub fn geographical_score(address: Option<&Address>, countries: &CountryRiskTable) -> FactorScore {
    let Some(address) = address else {
        return FactorScore::MIN;
    };
    let score = match countries.tier(&address.country) {
        CountryTier::High => 80,
        CountryTier::Medium => 40,
        CountryTier::Other => 10,
    };
    FactorScore::from_const(score)
}

/// Quantity purchased in the window over the average in-stock item quantity.
///
/// Zero when nothing is in stock.
pub fn turnover_rate(history: &PartHistory, window_start: NaiveDate) -> f64 {
    let purchased: f64 = history
        .order_lines
        .iter()
        .filter(|line| line.ordered_on_or_after(window_start))
        .map(|line| line.quantity)
        .sum();

    let in_stock: Vec<f64> = history
        .stock_items
        .iter()
        .filter(|item| item.in_stock)
        .map(|item| item.quantity)
        .collect();
    if in_stock.is_empty() {
        return 0.0;
    }
    let average = in_stock.iter().sum::<f64>() / in_stock.len() as f64;
    if average <= 0.0 {
        return 0.0;
    }
    purchased / average
}

pub fn days_on_hand(turnover: f64) -> f64 {
    if turnover > 0.0 {
        DAYS_PER_YEAR / turnover
    } else {
        SLOW_MOVING_DAYS
    }
}

pub fn stockout_score(
    history: &PartHistory,
    window_start: NaiveDate,
    thresholds: &StockoutThresholds,
) -> FactorScore {
    if history.on_hand() <= 0.0 {
        return FactorScore::MAX;
    }

    let days = days_on_hand(turnover_rate(history, window_start));
    let score = if days < thresholds.critical_days {
        90
    } else if days < thresholds.high_days {
        70
    } else if days < thresholds.medium_days {
        40
    } else {
        10
    };
    FactorScore::from_const(score)
}
