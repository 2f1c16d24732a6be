#![deny(warnings)]

//! Presentation rollups for simulation results.
//!
//! This module provides pure, total helpers for:
//! - Currency and unit formatting of the scoreboard metrics
//! - The five-card scoreboard and the history series behind each sparkline
//! - Client-side rollups the engine does not report (profit deltas, ASP, sell-through)

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use sim_contract::{HistoryField, SimulationParams, SimulationResult, SummaryRecord};

/// Rendered in place of values that cannot be formatted (NaN, infinities).
pub const NOT_AVAILABLE: &str = "n/a";

/// Round to cents from the exact binary value, so only one rounding happens.
fn to_cents(value: f64) -> Option<Decimal> {
    let exact = Decimal::from_f64_retain(value).or_else(|| Decimal::from_f64(value))?;
    let mut d = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    d.rescale(2);
    Some(d)
}

/// Insert `,` every three digits of the integer part of a plain decimal string.
fn group_thousands(plain: &str) -> String {
    let (int, frac) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain, None),
    };
    let mut out = String::with_capacity(plain.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Format a money amount as `$1,234.56` (negatives as `-$1,234.56`).
///
/// Example:
/// assert_eq!(format_currency(43210.5), "$43,210.50");
pub fn format_currency(value: f64) -> String {
    match to_cents(value) {
        Some(d) => {
            let sign = if d.is_sign_negative() && !d.is_zero() { "-" } else { "" };
            format!("{sign}${}", group_thousands(&d.abs().to_string()))
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a money delta with an explicit sign: `+$12.00`, `-$3.50`, `$0.00`.
pub fn format_signed_currency(value: f64) -> String {
    let body = format_currency(value);
    match to_cents(value) {
        Some(d) if d > Decimal::ZERO => format!("+{body}"),
        _ => body,
    }
}

/// Format a unit count with thousands separators.
pub fn format_units(units: u64) -> String {
    group_thousands(&units.to_string())
}

/// Format a percentage with one decimal place.
pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1}%")
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// Scoreboard values ready for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplaySummary {
    pub total_profit: String,
    pub competitor_total_profit: String,
    pub avg_user_price: String,
    pub avg_competitor_price: String,
    pub total_units_sold: String,
}

/// Project a summary into display strings. Does not touch `summary`.
pub fn project(summary: &SummaryRecord) -> DisplaySummary {
    DisplaySummary {
        total_profit: format_currency(summary.total_profit),
        competitor_total_profit: format_currency(summary.competitor_total_profit()),
        avg_user_price: format_currency(summary.avg_user_price),
        avg_competitor_price: format_currency(summary.avg_competitor_price()),
        total_units_sold: format_units(summary.total_units_sold),
    }
}

/// The five scoreboard metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMetric {
    YourProfit,
    CompetitorProfit,
    AvgPrice,
    CompetitorAvgPrice,
    UnitsSold,
}

impl ScoreMetric {
    pub const ALL: [ScoreMetric; 5] = [
        ScoreMetric::YourProfit,
        ScoreMetric::CompetitorProfit,
        ScoreMetric::AvgPrice,
        ScoreMetric::CompetitorAvgPrice,
        ScoreMetric::UnitsSold,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScoreMetric::YourProfit => "Your Profit",
            ScoreMetric::CompetitorProfit => "Comp. Profit",
            ScoreMetric::AvgPrice => "Avg Price",
            ScoreMetric::CompetitorAvgPrice => "Comp. Avg",
            ScoreMetric::UnitsSold => "Units Sold",
        }
    }

    /// History column drawn as the card's sparkline.
    pub fn sparkline(self) -> HistoryField {
        match self {
            ScoreMetric::YourProfit => HistoryField::DynamicCumulativeProfit,
            ScoreMetric::CompetitorProfit => HistoryField::CompetitorPrice,
            ScoreMetric::AvgPrice => HistoryField::UserPrice,
            ScoreMetric::CompetitorAvgPrice => HistoryField::CompetitorPrice,
            ScoreMetric::UnitsSold => HistoryField::ItemsSold,
        }
    }

    fn pick(self, d: &DisplaySummary) -> &str {
        match self {
            ScoreMetric::YourProfit => &d.total_profit,
            ScoreMetric::CompetitorProfit => &d.competitor_total_profit,
            ScoreMetric::AvgPrice => &d.avg_user_price,
            ScoreMetric::CompetitorAvgPrice => &d.avg_competitor_price,
            ScoreMetric::UnitsSold => &d.total_units_sold,
        }
    }
}

/// One scoreboard card.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreCard {
    pub metric: ScoreMetric,
    pub label: &'static str,
    pub value: String,
    pub sparkline: HistoryField,
}

/// Build the scoreboard cards in display order.
pub fn scoreboard(summary: &SummaryRecord) -> Vec<ScoreCard> {
    let display = project(summary);
    ScoreMetric::ALL
        .into_iter()
        .map(|metric| ScoreCard {
            metric,
            label: metric.label(),
            value: metric.pick(&display).to_string(),
            sparkline: metric.sparkline(),
        })
        .collect()
}

/// Average selling price computed as sum(p_i * q_i) / sum(q_i).
/// Returns None when total quantity is zero, a price is negative, or the
/// weighted sum overflows.
///
/// Example:
/// let prices = [Decimal::new(100,2), Decimal::new(200,2)];
/// let qty = [1, 1];
/// assert_eq!(asp(&prices, &qty).unwrap(), Decimal::new(150,2));
pub fn asp(prices: &[Decimal], quantities: &[u64]) -> Option<Decimal> {
    if prices.len() != quantities.len() || prices.is_empty() {
        return None;
    }
    let mut num = Decimal::ZERO;
    let mut den: u128 = 0;
    for (p, &q) in prices.iter().zip(quantities) {
        if *p < Decimal::ZERO {
            return None;
        }
        num = num.checked_add(p.checked_mul(Decimal::from(q))?)?;
        den = den.saturating_add(q as u128);
    }
    if den == 0 {
        return None;
    }
    num.checked_div(Decimal::from_u128(den)?)
}

/// Mean of the strictly positive values; stock-out days are priced at 0 and skipped.
fn mean_of_priced(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Metrics derived on the client from a run's history.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunRollup {
    pub days: usize,
    /// Final dynamic cumulative profit minus final static cumulative profit.
    pub profit_advantage: f64,
    /// Reported profit minus reported competitor profit.
    pub lead_over_competitor: f64,
    /// Units sold as a percentage of starting inventory. None for zero inventory.
    pub sell_through_pct: Option<f64>,
    /// First day stock reached zero.
    pub stockout_day: Option<u32>,
    /// Average price weighted by units sold each day.
    pub realized_asp: Option<f64>,
    pub avg_priced_user_price: Option<f64>,
    pub avg_priced_competitor_price: Option<f64>,
}

/// Derive client-side rollups for a run.
pub fn rollup(params: &SimulationParams, result: &SimulationResult) -> RunRollup {
    let history = &result.history;
    let summary = &result.summary;
    let profit_advantage = history
        .last()
        .map(|r| r.dynamic_cumulative_profit - r.static_cumulative_profit)
        .unwrap_or(0.0);
    let sell_through_pct = (params.total_inventory > 0)
        .then(|| summary.total_units_sold as f64 / params.total_inventory as f64 * 100.0);
    let stockout_day = history.iter().find(|r| r.stock_level == 0).map(|r| r.day);

    let prices: Option<Vec<Decimal>> = history
        .iter()
        .map(|r| Decimal::from_f64(r.user_price))
        .collect();
    let quantities: Vec<u64> = history.iter().map(|r| r.items_sold).collect();
    let realized_asp = prices
        .and_then(|p| asp(&p, &quantities))
        .and_then(|d| d.to_f64());

    RunRollup {
        days: history.len(),
        profit_advantage,
        lead_over_competitor: summary.total_profit - summary.competitor_total_profit(),
        sell_through_pct,
        stockout_day,
        realized_asp,
        avg_priced_user_price: mean_of_priced(history.iter().map(|r| r.user_price)),
        avg_priced_competitor_price: mean_of_priced(history.iter().map(|r| r.competitor_price)),
    }
}

/// Rollup values ready for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayRollup {
    pub profit_advantage: String,
    pub lead_over_competitor: String,
    pub sell_through: String,
    pub stockout: String,
    pub realized_asp: String,
}

impl RunRollup {
    pub fn display(&self) -> DisplayRollup {
        DisplayRollup {
            profit_advantage: format_signed_currency(self.profit_advantage),
            lead_over_competitor: format_signed_currency(self.lead_over_competitor),
            sell_through: self
                .sell_through_pct
                .map(format_percent)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            stockout: match self.stockout_day {
                Some(d) => format!("day {d}"),
                None => "none".to_string(),
            },
            realized_asp: self
                .realized_asp
                .map(format_currency)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}
