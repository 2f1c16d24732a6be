#![deny(warnings)]

//! Pricing simulation dashboard view-model.
//!
//! Turns the per-day history returned by the remote simulator into
//! cross-linked chart state: four panels, a scoreboard, an insight panel,
//! and one active day shared by all of them.
//!
//! ```text
//! form ──► Dashboard::submit ──► SimulationBackend ──► HistoryStore
//!                                                          │
//!  hover on any panel ──► ActiveDaySelector ──┐            │
//!                                             ▼            ▼
//!                                       Dashboard::frame() ──► renderer
//! ```
//!
//! - [`Dashboard`]: run lifecycle, single writer of store and selection
//! - [`HistoryStore`]: latest committed run as one immutable snapshot
//! - [`ActiveDaySelector`]: last-write-wins hover selection
//! - [`Frame`]: everything a renderer needs for one pass
//! - [`DashboardConfig`]: YAML configuration with environment overrides

pub mod config;
pub mod frame;
pub mod insight;
pub mod panels;
pub mod selection;
pub mod shell;
pub mod store;
pub mod theme;

pub use config::{ConfigError, DashboardConfig, ResubmitPolicy};
pub use frame::{Frame, ScoreCardView};
pub use insight::InsightView;
pub use panels::{PanelBody, PanelKind, PanelView, Series, Tooltip};
pub use selection::{ActiveDaySelector, Selection};
pub use shell::{
    Completion, Dashboard, DashboardEvent, Notice, Phase, RunRequest, RunTicket, SubmitRejected,
};
pub use store::{HistoryStore, RunId, RunSnapshot};
pub use theme::{Palette, Theme, ThemeMode};
