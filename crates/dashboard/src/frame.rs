//! One render pass worth of view state.
//!
//! A [`Frame`] is built from a single store snapshot and a single selection,
//! so every panel, the scoreboard and the insight panel agree on the run and
//! on the active day.

use serde::Serialize;
use sim_contract::HistoryRecord;
use sim_summary::{rollup, scoreboard, DisplayRollup, ScoreCard, ScoreMetric};

use crate::insight::InsightView;
use crate::panels::{build_panel, series_values, PanelKind, PanelView};
use crate::shell::{Notice, Phase};
use crate::store::{RunId, RunSnapshot};
use crate::theme::{Palette, Theme, Tone};

/// A scoreboard card with its sparkline data.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreCardView {
    #[serde(flatten)]
    pub card: ScoreCard,
    pub sparkline_values: Vec<f64>,
    pub color: &'static str,
}

fn card_tone(metric: ScoreMetric) -> Tone {
    match metric {
        ScoreMetric::YourProfit => Tone::Success,
        ScoreMetric::CompetitorProfit => Tone::Danger,
        ScoreMetric::AvgPrice => Tone::Primary,
        ScoreMetric::CompetitorAvgPrice => Tone::Slate,
        ScoreMetric::UnitsSold => Tone::Warning,
    }
}

/// Complete view state for one render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub phase: Phase,
    pub theme: Theme,
    pub notice: Option<Notice>,
    /// Run the frame was built from.
    pub run: Option<RunId>,
    pub active_day: Option<u32>,
    /// `None` until the first run commits.
    pub scoreboard: Option<Vec<ScoreCardView>>,
    pub rollup: Option<DisplayRollup>,
    pub panels: Vec<PanelView>,
    pub insight: InsightView,
}

impl Frame {
    /// Panel of the given kind.
    pub fn panel(&self, kind: PanelKind) -> Option<&PanelView> {
        self.panels.iter().find(|p| p.kind == kind)
    }
}

fn score_cards(snap: &RunSnapshot, palette: &Palette) -> Vec<ScoreCardView> {
    scoreboard(snap.summary())
        .into_iter()
        .map(|card| ScoreCardView {
            sparkline_values: series_values(snap.history(), card.sparkline),
            color: palette.color(card_tone(card.metric)),
            card,
        })
        .collect()
}

/// Assemble a frame. `active` must already belong to `snapshot`.
pub(crate) fn build(
    phase: Phase,
    theme: &Theme,
    notice: Option<&Notice>,
    snapshot: Option<&RunSnapshot>,
    active: Option<&HistoryRecord>,
) -> Frame {
    let palette = &theme.palette;
    Frame {
        phase,
        theme: theme.clone(),
        notice: notice.cloned(),
        run: snapshot.map(|s| s.id),
        active_day: active.map(|r| r.day),
        scoreboard: snapshot.map(|s| score_cards(s, palette)),
        rollup: snapshot.map(|s| rollup(&s.params, &s.result).display()),
        panels: PanelKind::ALL
            .into_iter()
            .map(|kind| build_panel(kind, snapshot, active, palette))
            .collect(),
        insight: InsightView::build(snapshot.is_some(), active),
    }
}
