//! The pricing-rationale panel.

use serde::Serialize;
use sim_contract::HistoryRecord;

pub const AWAITING_RUN: &str = "Run a simulation to see the pricing rationale for each day.";
pub const AWAITING_HOVER: &str = "Hover over a chart to see the strategy insight for that day.";

/// What the insight panel shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InsightView {
    /// Active day, if any.
    pub day: Option<u32>,
    pub text: String,
}

impl InsightView {
    /// `has_data` is whether any run has committed. The active record's
    /// insight is shown verbatim, even when empty.
    pub fn build(has_data: bool, active: Option<&HistoryRecord>) -> Self {
        match active {
            Some(r) => Self {
                day: Some(r.day),
                text: r.insight.clone(),
            },
            None if has_data => Self {
                day: None,
                text: AWAITING_HOVER.to_string(),
            },
            None => Self {
                day: None,
                text: AWAITING_RUN.to_string(),
            },
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.day.is_none()
    }
}
