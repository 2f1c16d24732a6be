#![deny(warnings)]

//! Data contract shared with the remote pricing simulator.
//!
//! This crate defines the serializable request/response shapes exchanged over
//! `POST /api/simulate`, with validation helpers that guard the invariants the
//! dashboard relies on (finite parameters, ordered history).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Path of the simulation endpoint relative to the simulator base URL.
pub const SIMULATE_PATH: &str = "/api/simulate";

/// User-editable inputs for one simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Starting list price (> 0). Also the fixed price of the static strategy.
    pub initial_price: f64,
    /// Unit cost (>= 0).
    pub cost_price: f64,
    /// Units available for the whole run.
    pub total_inventory: u64,
    /// Baseline daily demand (>= 0).
    pub base_demand: f64,
    /// Demand sensitivity to price (>= 0).
    pub sensitivity: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            initial_price: 45.0,
            cost_price: 30.0,
            total_inventory: 3000,
            base_demand: 200.0,
            sensitivity: 2.5,
        }
    }
}

/// Editable fields of [`SimulationParams`], as exposed by input forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamField {
    InitialPrice,
    CostPrice,
    TotalInventory,
    BaseDemand,
    Sensitivity,
}

impl ParamField {
    pub const ALL: [ParamField; 5] = [
        ParamField::InitialPrice,
        ParamField::CostPrice,
        ParamField::TotalInventory,
        ParamField::BaseDemand,
        ParamField::Sensitivity,
    ];

    /// Wire name of the field.
    pub fn key(self) -> &'static str {
        match self {
            ParamField::InitialPrice => "initial_price",
            ParamField::CostPrice => "cost_price",
            ParamField::TotalInventory => "total_inventory",
            ParamField::BaseDemand => "base_demand",
            ParamField::Sensitivity => "sensitivity",
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ParamField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamField::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

/// One simulated day as produced by the remote engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// 1-based day index.
    pub day: u32,
    pub user_price: f64,
    pub competitor_price: f64,
    /// Share of the day's demand captured, in percent.
    pub market_share: f64,
    pub items_sold: u64,
    /// Remaining stock after the day's sales.
    pub stock_level: u64,
    /// Running profit of the dynamic strategy.
    pub dynamic_cumulative_profit: f64,
    /// Running profit of the fixed-price strategy.
    pub static_cumulative_profit: f64,
    /// Free-text rationale for the day's pricing decision.
    pub insight: String,
}

/// Numeric columns of [`HistoryRecord`] that charts can plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryField {
    UserPrice,
    CompetitorPrice,
    MarketShare,
    ItemsSold,
    StockLevel,
    DynamicCumulativeProfit,
    StaticCumulativeProfit,
}

impl HistoryField {
    /// Extract the column value from a record.
    pub fn value(self, r: &HistoryRecord) -> f64 {
        match self {
            HistoryField::UserPrice => r.user_price,
            HistoryField::CompetitorPrice => r.competitor_price,
            HistoryField::MarketShare => r.market_share,
            HistoryField::ItemsSold => r.items_sold as f64,
            HistoryField::StockLevel => r.stock_level as f64,
            HistoryField::DynamicCumulativeProfit => r.dynamic_cumulative_profit,
            HistoryField::StaticCumulativeProfit => r.static_cumulative_profit,
        }
    }

    /// Whether the column holds a money amount.
    pub fn is_money(self) -> bool {
        matches!(
            self,
            HistoryField::UserPrice
                | HistoryField::CompetitorPrice
                | HistoryField::DynamicCumulativeProfit
                | HistoryField::StaticCumulativeProfit
        )
    }
}

/// Aggregate metrics for one run.
///
/// Older engine builds omit the competitor fields; they deserialize to `None`
/// and read as `0.0` through the accessors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub total_profit: f64,
    pub total_units_sold: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_total_profit: Option<f64>,
    pub avg_user_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_competitor_price: Option<f64>,
}

impl SummaryRecord {
    /// Competitor profit, `0.0` when the engine did not report it.
    pub fn competitor_total_profit(&self) -> f64 {
        self.competitor_total_profit.unwrap_or(0.0)
    }

    /// Competitor average price, `0.0` when the engine did not report it.
    pub fn avg_competitor_price(&self) -> f64 {
        self.avg_competitor_price.unwrap_or(0.0)
    }
}

/// Successful response body of the simulation endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub history: Vec<HistoryRecord>,
    pub summary: SummaryRecord,
}

impl SimulationResult {
    /// Record for `day`, if present. History is sorted, so this is a binary search.
    pub fn record(&self, day: u32) -> Option<&HistoryRecord> {
        self.history
            .binary_search_by_key(&day, |r| r.day)
            .ok()
            .map(|i| &self.history[i])
    }
}

/// Validation errors for simulation parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Field value is NaN or infinite.
    #[error("{0} must be a finite number")]
    NonFinite(ParamField),
    /// Initial price must be strictly positive.
    #[error("initial_price must be > 0")]
    NonPositivePrice,
    /// Field must be >= 0.
    #[error("{0} must not be negative")]
    Negative(ParamField),
    /// Text input could not be coerced to a number.
    #[error("{field}: {input:?} is not a number")]
    NotANumber { field: ParamField, input: String },
    /// Unknown parameter name.
    #[error("unknown parameter: {0}")]
    UnknownField(String),
}

/// Violations of the history ordering guarantee.
#[derive(Debug, Error, PartialEq)]
pub enum HistoryError {
    #[error("history is empty")]
    Empty,
    #[error("history not sorted by day: day {next} follows day {prev}")]
    OutOfOrder { prev: u32, next: u32 },
    #[error("duplicate day {0} in history")]
    DuplicateDay(u32),
}

/// Validate simulation parameters before submission.
pub fn validate_params(p: &SimulationParams) -> Result<(), ValidationError> {
    let floats = [
        (ParamField::InitialPrice, p.initial_price),
        (ParamField::CostPrice, p.cost_price),
        (ParamField::BaseDemand, p.base_demand),
        (ParamField::Sensitivity, p.sensitivity),
    ];
    for (field, v) in floats {
        if !v.is_finite() {
            return Err(ValidationError::NonFinite(field));
        }
    }
    if p.initial_price <= 0.0 {
        return Err(ValidationError::NonPositivePrice);
    }
    for (field, v) in floats.into_iter().skip(1) {
        if v < 0.0 {
            return Err(ValidationError::Negative(field));
        }
    }
    Ok(())
}

impl SimulationParams {
    /// Coerce form text into the given field.
    ///
    /// Leaves `self` unchanged on error, so a half-typed value never reaches a request.
    /// Range checks are left to [`validate_params`].
    pub fn set_field(&mut self, field: ParamField, input: &str) -> Result<(), ValidationError> {
        let text = input.trim();
        let nan = || ValidationError::NotANumber {
            field,
            input: input.to_string(),
        };
        let slot = match field {
            ParamField::TotalInventory => {
                self.total_inventory = text.parse::<u64>().map_err(|_| nan())?;
                return Ok(());
            }
            ParamField::InitialPrice => &mut self.initial_price,
            ParamField::CostPrice => &mut self.cost_price,
            ParamField::BaseDemand => &mut self.base_demand,
            ParamField::Sensitivity => &mut self.sensitivity,
        };
        let v: f64 = text.parse().map_err(|_| nan())?;
        if !v.is_finite() {
            return Err(ValidationError::NonFinite(field));
        }
        *slot = v;
        Ok(())
    }

    /// Current value of a field as a float, for display.
    pub fn get(&self, field: ParamField) -> f64 {
        match field {
            ParamField::InitialPrice => self.initial_price,
            ParamField::CostPrice => self.cost_price,
            ParamField::TotalInventory => self.total_inventory as f64,
            ParamField::BaseDemand => self.base_demand,
            ParamField::Sensitivity => self.sensitivity,
        }
    }
}

/// Check that history is non-empty, strictly ascending by day, with no duplicates.
pub fn validate_history(history: &[HistoryRecord]) -> Result<(), HistoryError> {
    if history.is_empty() {
        return Err(HistoryError::Empty);
    }
    for w in history.windows(2) {
        let (prev, next) = (w[0].day, w[1].day);
        if next == prev {
            return Err(HistoryError::DuplicateDay(next));
        }
        if next < prev {
            return Err(HistoryError::OutOfOrder { prev, next });
        }
    }
    Ok(())
}

/// Non-fatal contract deviations. The dashboard displays such runs anyway.
#[derive(Clone, Debug, PartialEq)]
pub enum AuditWarning {
    /// First day is not 1.
    DoesNotStartAtOne(u32),
    /// Gap between consecutive days.
    GapAfter(u32),
    /// Stock rose from one day to the next.
    StockIncreased { day: u32, from: u64, to: u64 },
    /// Market share outside [0, 100].
    ShareOutOfRange { day: u32, share: f64 },
    /// Summary claims more units sold than were in inventory.
    OversoldInventory { sold: u64, inventory: u64 },
}

impl fmt::Display for AuditWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditWarning::DoesNotStartAtOne(d) => write!(f, "history starts at day {d}"),
            AuditWarning::GapAfter(d) => write!(f, "gap in history after day {d}"),
            AuditWarning::StockIncreased { day, from, to } => {
                write!(f, "stock rose from {from} to {to} on day {day}")
            }
            AuditWarning::ShareOutOfRange { day, share } => {
                write!(f, "market share {share} out of range on day {day}")
            }
            AuditWarning::OversoldInventory { sold, inventory } => {
                write!(f, "{sold} units sold exceeds inventory of {inventory}")
            }
        }
    }
}

/// Audit a run against the properties the engine is expected to uphold.
///
/// Assumes `validate_history` already passed.
pub fn audit_run(params: &SimulationParams, result: &SimulationResult) -> Vec<AuditWarning> {
    let mut out = Vec::new();
    let history = &result.history;
    if let Some(first) = history.first() {
        if first.day != 1 {
            out.push(AuditWarning::DoesNotStartAtOne(first.day));
        }
    }
    for r in history {
        if !(0.0..=100.0).contains(&r.market_share) {
            out.push(AuditWarning::ShareOutOfRange {
                day: r.day,
                share: r.market_share,
            });
        }
    }
    for w in history.windows(2) {
        if w[1].day != w[0].day + 1 {
            out.push(AuditWarning::GapAfter(w[0].day));
        }
        if w[1].stock_level > w[0].stock_level {
            out.push(AuditWarning::StockIncreased {
                day: w[1].day,
                from: w[0].stock_level,
                to: w[1].stock_level,
            });
        }
    }
    if result.summary.total_units_sold > params.total_inventory {
        out.push(AuditWarning::OversoldInventory {
            sold: result.summary.total_units_sold,
            inventory: params.total_inventory,
        });
    }
    for w in &out {
        warn!(warning = %w, "simulation contract audit");
    }
    out
}
