//! Chart panels: series data, highlight state and tooltips.
//!
//! Drawing is left to the front end. Each panel turns the current run into
//! plottable series plus the active-day highlight, all from the same
//! [`RunSnapshot`] and the same selection.

use serde::{Deserialize, Serialize};
use sim_contract::{HistoryField, HistoryRecord};
use sim_summary::{format_currency, format_percent, format_units};

use crate::store::RunSnapshot;
use crate::theme::{Palette, Tone};

/// Shown by every panel until the first run commits.
pub const NO_DATA_MESSAGE: &str =
    "No simulation results yet. Run a simulation to populate this chart.";

/// Headroom added around the price panel's data range.
const PRICE_DOMAIN_PADDING: f64 = 10.0;

/// The independent chart surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    /// Your price against the competitor's.
    PriceComparison,
    /// Cumulative profit of the dynamic and static strategies.
    ProfitComparison,
    /// Daily sales bars over remaining stock.
    InventorySales,
    /// Share of daily demand captured.
    MarketShare,
}

/// How a series is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Line,
    DashedLine,
    Area,
    StepArea,
    Bar,
}

/// Y axis a series is scaled against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug)]
struct SeriesSpec {
    field: HistoryField,
    label: &'static str,
    mark: Mark,
    axis: Axis,
    tone: Tone,
}

const fn spec(
    field: HistoryField,
    label: &'static str,
    mark: Mark,
    axis: Axis,
    tone: Tone,
) -> SeriesSpec {
    SeriesSpec {
        field,
        label,
        mark,
        axis,
        tone,
    }
}

const PRICE_SERIES: [SeriesSpec; 2] = [
    spec(HistoryField::UserPrice, "Your Price", Mark::Line, Axis::Left, Tone::Primary),
    spec(
        HistoryField::CompetitorPrice,
        "Competitor",
        Mark::DashedLine,
        Axis::Left,
        Tone::Slate,
    ),
];

const PROFIT_SERIES: [SeriesSpec; 2] = [
    spec(
        HistoryField::DynamicCumulativeProfit,
        "Dynamic AI",
        Mark::Area,
        Axis::Left,
        Tone::Success,
    ),
    spec(
        HistoryField::StaticCumulativeProfit,
        "Static Base",
        Mark::DashedLine,
        Axis::Left,
        Tone::Slate,
    ),
];

const INVENTORY_SERIES: [SeriesSpec; 2] = [
    spec(HistoryField::ItemsSold, "Daily Sales", Mark::Bar, Axis::Left, Tone::Warning),
    spec(HistoryField::StockLevel, "Inventory", Mark::StepArea, Axis::Right, Tone::Purple),
];

const SHARE_SERIES: [SeriesSpec; 1] = [spec(
    HistoryField::MarketShare,
    "Share %",
    Mark::Area,
    Axis::Left,
    Tone::Indigo,
)];

impl PanelKind {
    pub const ALL: [PanelKind; 4] = [
        PanelKind::PriceComparison,
        PanelKind::ProfitComparison,
        PanelKind::InventorySales,
        PanelKind::MarketShare,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PanelKind::PriceComparison => "Automated Strategy vs. Competitor",
            PanelKind::ProfitComparison => "Cumulative Profit: Dynamic vs. Static",
            PanelKind::InventorySales => "Inventory and Daily Sales",
            PanelKind::MarketShare => "Market Share (%)",
        }
    }

    fn series(self) -> &'static [SeriesSpec] {
        match self {
            PanelKind::PriceComparison => &PRICE_SERIES,
            PanelKind::ProfitComparison => &PROFIT_SERIES,
            PanelKind::InventorySales => &INVENTORY_SERIES,
            PanelKind::MarketShare => &SHARE_SERIES,
        }
    }

    /// Only the price panel carries the day's rationale in its tooltip.
    pub fn tooltip_shows_insight(self) -> bool {
        self == PanelKind::PriceComparison
    }
}

/// One data point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub day: u32,
    pub value: f64,
}

/// A plottable series.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    pub field: HistoryField,
    pub label: &'static str,
    pub mark: Mark,
    pub axis: Axis,
    pub color: &'static str,
    pub points: Vec<Point>,
}

/// Tooltip line: series label and formatted value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TooltipRow {
    pub label: &'static str,
    pub value: String,
}

/// Tooltip for the active day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub day: u32,
    pub rows: Vec<TooltipRow>,
    pub insight: Option<String>,
}

/// Panel content.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PanelBody {
    /// No run has committed yet.
    Placeholder { message: &'static str },
    Chart {
        series: Vec<Series>,
        /// Fixed or padded left-axis range; `None` lets the renderer autoscale.
        y_domain: Option<(f64, f64)>,
        highlight_day: Option<u32>,
        tooltip: Option<Tooltip>,
    },
}

/// Everything a renderer needs for one panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PanelView {
    pub kind: PanelKind,
    pub title: &'static str,
    pub body: PanelBody,
}

impl PanelView {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.body, PanelBody::Placeholder { .. })
    }

    pub fn highlight_day(&self) -> Option<u32> {
        match &self.body {
            PanelBody::Chart { highlight_day, .. } => *highlight_day,
            PanelBody::Placeholder { .. } => None,
        }
    }

    pub fn series(&self) -> &[Series] {
        match &self.body {
            PanelBody::Chart { series, .. } => series,
            PanelBody::Placeholder { .. } => &[],
        }
    }
}

/// Column of `field` across the history.
pub fn series_values(history: &[HistoryRecord], field: HistoryField) -> Vec<f64> {
    history.iter().map(|r| field.value(r)).collect()
}

/// Format a column value the way tooltips show it.
pub fn format_field_value(field: HistoryField, value: f64) -> String {
    if field.is_money() {
        return format_currency(value);
    }
    match field {
        HistoryField::MarketShare => format_percent(value),
        _ => format_units(value as u64),
    }
}

fn y_domain(kind: PanelKind, series: &[Series]) -> Option<(f64, f64)> {
    match kind {
        PanelKind::MarketShare => Some((0.0, 100.0)),
        PanelKind::PriceComparison => {
            let values = series.iter().flat_map(|s| s.points.iter().map(|p| p.value));
            let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
            (lo.is_finite() && hi.is_finite())
                .then(|| (lo - PRICE_DOMAIN_PADDING, hi + PRICE_DOMAIN_PADDING))
        }
        PanelKind::ProfitComparison | PanelKind::InventorySales => None,
    }
}

fn tooltip(kind: PanelKind, active: &HistoryRecord) -> Tooltip {
    Tooltip {
        day: active.day,
        rows: kind
            .series()
            .iter()
            .map(|s| TooltipRow {
                label: s.label,
                value: format_field_value(s.field, s.field.value(active)),
            })
            .collect(),
        insight: kind
            .tooltip_shows_insight()
            .then(|| active.insight.clone()),
    }
}

/// Build one panel from the current run and active day.
///
/// `active` is ignored unless its day exists in `snapshot`.
pub fn build_panel(
    kind: PanelKind,
    snapshot: Option<&RunSnapshot>,
    active: Option<&HistoryRecord>,
    palette: &Palette,
) -> PanelView {
    let Some(snap) = snapshot else {
        return PanelView {
            kind,
            title: kind.title(),
            body: PanelBody::Placeholder {
                message: NO_DATA_MESSAGE,
            },
        };
    };
    let history = snap.history();
    let series: Vec<Series> = kind
        .series()
        .iter()
        .map(|s| Series {
            field: s.field,
            label: s.label,
            mark: s.mark,
            axis: s.axis,
            color: palette.color(s.tone),
            points: history
                .iter()
                .map(|r| Point {
                    day: r.day,
                    value: s.field.value(r),
                })
                .collect(),
        })
        .collect();
    let active = active.filter(|a| snap.record(a.day).is_some());
    PanelView {
        kind,
        title: kind.title(),
        body: PanelBody::Chart {
            y_domain: y_domain(kind, &series),
            series,
            highlight_day: active.map(|a| a.day),
            tooltip: active.map(|a| tooltip(kind, a)),
        },
    }
}

/// Resolve a horizontal pointer position to the nearest data point.
///
/// `x_fraction` is the pointer's position across the plot area, 0.0 at the
/// first day and 1.0 at the last. Points sit on an evenly spaced category
/// axis. Positions outside the plot area resolve to nothing.
pub fn nearest_record(history: &[HistoryRecord], x_fraction: f64) -> Option<&HistoryRecord> {
    if history.is_empty() || !(0.0..=1.0).contains(&x_fraction) {
        return None;
    }
    let last = history.len() - 1;
    let idx = (x_fraction * last as f64).round() as usize;
    history.get(idx.min(last))
}
