//! The dashboard shell: run lifecycle, store and selection ownership.
//!
//! [`Dashboard`] is the single writer of the [`HistoryStore`] and the
//! [`ActiveDaySelector`]. Every state transition happens synchronously on the
//! owner's thread; only the backend call itself is awaited.
//!
//! ```text
//!   Idle ──submit──▶ Running ──ok──▶ Ready ──submit──▶ Running ...
//!                       │
//!                       └──err──▶ Failed ──submit──▶ Running
//!                                   └──dismiss──▶ Ready | Idle
//! ```
//!
//! Each request carries a [`RunTicket`]. Only the completion holding the most
//! recently issued ticket may commit; anything older is discarded on arrival.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sim_client::{ErrorKind, SimulationBackend, SimulationError};
use sim_contract::{
    audit_run, validate_history, validate_params, HistoryRecord, ParamField, SimulationParams,
    SimulationResult, ValidationError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{DashboardConfig, ResubmitPolicy};
use crate::frame::{self, Frame};
use crate::panels::{nearest_record, PanelKind};
use crate::selection::{record_from_payload, ActiveDaySelector};
use crate::store::{HistoryStore, RunId, RunSnapshot};
use crate::theme::{Theme, ThemeMode};

/// Sequence number of a submitted request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RunTicket(pub u64);

impl std::fmt::Display for RunTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ticket#{}", self.0)
    }
}

/// Lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    /// No run has committed and none is in flight.
    Idle,
    /// Waiting on the request with this ticket.
    Running { ticket: RunTicket },
    /// The latest run committed.
    Ready,
    /// The latest run failed; earlier data, if any, is still shown.
    Failed,
}

impl Phase {
    pub fn is_running(self) -> bool {
        matches!(self, Phase::Running { .. })
    }
}

/// Transient, dismissible failure message.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Notice {
    pub kind: ErrorKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

/// Why a submission did not start a run.
#[derive(Debug, Error, PartialEq)]
pub enum SubmitRejected {
    #[error("a simulation is already running")]
    AlreadyRunning,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// An issued request: the ticket plus the parameters it was sent with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunRequest {
    pub ticket: RunTicket,
    pub params: SimulationParams,
}

/// What happened to a completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The run replaced the store.
    Committed(RunId),
    /// The run failed; the store is unchanged.
    Failed(ErrorKind),
    /// A newer request was issued after this one.
    Discarded,
}

/// State changes, for front ends that react to events rather than poll frames.
#[derive(Clone, Debug, PartialEq)]
pub enum DashboardEvent {
    RunStarted(RunTicket),
    RunCommitted { run: RunId, days: usize },
    RunFailed(ErrorKind),
    StaleDiscarded(RunTicket),
    /// New active day, or `None` when cleared.
    SelectionChanged(Option<u32>),
    ThemeChanged(ThemeMode),
}

/// Events kept for [`Dashboard::drain_events`]; the oldest are dropped beyond this.
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// The dashboard view-model.
pub struct Dashboard {
    config: DashboardConfig,
    params: SimulationParams,
    theme: Theme,
    phase: Phase,
    notice: Option<Notice>,
    store: HistoryStore,
    selector: ActiveDaySelector,
    last_ticket: u64,
    events: VecDeque<DashboardEvent>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            params: config.defaults,
            theme: Theme::new(config.theme),
            phase: Phase::Idle,
            notice: None,
            store: HistoryStore::new(),
            selector: ActiveDaySelector::new(),
            last_ticket: 0,
            events: VecDeque::new(),
            config,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, mode: ThemeMode) {
        if self.theme.mode != mode {
            self.theme = Theme::new(mode);
            self.emit(DashboardEvent::ThemeChanged(mode));
        }
    }

    pub fn toggle_theme(&mut self) {
        let next = self.theme.toggled().mode;
        self.set_theme(next);
    }

    // ---- parameters ----

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Replace all parameters. Rejected values leave the form unchanged.
    pub fn set_params(&mut self, params: SimulationParams) -> Result<(), ValidationError> {
        validate_params(&params)?;
        self.params = params;
        Ok(())
    }

    /// Apply one text-field edit. Range checks happen on submit.
    pub fn edit_param(&mut self, field: ParamField, input: &str) -> Result<(), ValidationError> {
        self.params.set_field(field, input)
    }

    // ---- run lifecycle ----

    /// Issue a ticket for the current parameters and enter `Running`.
    pub fn begin_run(&mut self) -> Result<RunRequest, SubmitRejected> {
        if let Phase::Running { ticket } = self.phase {
            if self.config.resubmit == ResubmitPolicy::Ignore {
                debug!(%ticket, "submission ignored while running");
                return Err(SubmitRejected::AlreadyRunning);
            }
            info!(%ticket, "superseding in-flight run");
        }
        if let Err(e) = validate_params(&self.params) {
            warn!(error = %e, "parameters rejected");
            self.notice = Some(Notice::new(ErrorKind::Validation, e.to_string()));
            return Err(e.into());
        }
        self.last_ticket += 1;
        let ticket = RunTicket(self.last_ticket);
        self.phase = Phase::Running { ticket };
        self.emit(DashboardEvent::RunStarted(ticket));
        info!(%ticket, params = ?self.params, "simulation run started");
        Ok(RunRequest {
            ticket,
            params: self.params,
        })
    }

    /// Apply the outcome of `request`.
    pub fn complete_run(
        &mut self,
        request: RunRequest,
        outcome: Result<SimulationResult, SimulationError>,
    ) -> Completion {
        if self.phase != (Phase::Running { ticket: request.ticket }) {
            info!(
                ticket = %request.ticket,
                latest = self.last_ticket,
                "discarding stale completion"
            );
            self.emit(DashboardEvent::StaleDiscarded(request.ticket));
            return Completion::Discarded;
        }
        let checked = outcome.and_then(|result| {
            validate_history(&result.history)
                .map_err(|e| SimulationError::MalformedResponse(e.to_string()))?;
            Ok(result)
        });
        match checked {
            Ok(result) => self.commit(request, result),
            Err(e) => self.fail(request.ticket, e),
        }
    }

    fn commit(&mut self, request: RunRequest, result: SimulationResult) -> Completion {
        audit_run(&request.params, &result);
        let days = result.history.len();
        let snap = self.store.replace(RunSnapshot {
            id: RunId(request.ticket.0),
            params: request.params,
            result,
            completed_at: Utc::now(),
        });
        self.clear_selection();
        self.phase = Phase::Ready;
        self.notice = None;
        self.emit(DashboardEvent::RunCommitted { run: snap.id, days });
        info!(run = %snap.id, days, "simulation run committed");
        Completion::Committed(snap.id)
    }

    fn fail(&mut self, ticket: RunTicket, err: SimulationError) -> Completion {
        let kind = err.kind();
        warn!(%ticket, ?kind, error = %err, "simulation run failed");
        self.phase = Phase::Failed;
        self.notice = Some(Notice::new(kind, err.to_string()));
        self.emit(DashboardEvent::RunFailed(kind));
        Completion::Failed(kind)
    }

    /// Begin a run, await `backend`, and apply the result.
    pub async fn submit(
        &mut self,
        backend: &dyn SimulationBackend,
    ) -> Result<Completion, SubmitRejected> {
        let request = self.begin_run()?;
        let outcome = backend.run(&request.params).await;
        Ok(self.complete_run(request, outcome))
    }

    /// Hide the notice. A failed phase falls back to `Ready` or `Idle`.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        if self.phase == Phase::Failed {
            self.phase = if self.store.is_empty() {
                Phase::Idle
            } else {
                Phase::Ready
            };
        }
    }

    // ---- hover ----

    fn select(&mut self, source: PanelKind, record: HistoryRecord) {
        let Some(run) = self.store.peek().map(|s| s.id) else {
            return;
        };
        let day = record.day;
        self.selector.select(run, &record, source);
        self.emit(DashboardEvent::SelectionChanged(Some(day)));
    }

    fn clear_selection(&mut self) {
        if self.selector.clear() {
            debug!("active day cleared");
            self.emit(DashboardEvent::SelectionChanged(None));
        }
    }

    /// Pointer moved over `panel` at `x_fraction` across its plot area.
    /// Returns the day now active, if the position resolved to one.
    pub fn hover(&mut self, panel: PanelKind, x_fraction: f64) -> Option<u32> {
        let record = nearest_record(self.store.peek()?.history(), x_fraction)?.clone();
        let day = record.day;
        self.select(panel, record);
        Some(day)
    }

    /// Select `day` of the current run directly.
    pub fn hover_day(&mut self, panel: PanelKind, day: u32) -> bool {
        let Some(record) = self.store.peek().and_then(|s| s.record(day)).cloned() else {
            debug!(day, "hover on unknown day ignored");
            return false;
        };
        self.select(panel, record);
        true
    }

    /// Accept a raw hover payload from a chart front end.
    ///
    /// The payload must decode to a record identical to the current run's
    /// record for that day; anything else is ignored.
    pub fn hover_payload(&mut self, panel: PanelKind, payload: &Value) -> bool {
        let Some(record) = record_from_payload(payload) else {
            debug!(?panel, "malformed hover payload ignored");
            return false;
        };
        let matches = self
            .store
            .peek()
            .and_then(|s| s.record(record.day))
            .is_some_and(|r| *r == record);
        if !matches {
            debug!(?panel, day = record.day, "hover payload not from current run");
            return false;
        }
        self.select(panel, record);
        true
    }

    /// Pointer left every chart surface.
    pub fn pointer_left(&mut self) {
        if self.config.clear_on_pointer_leave {
            self.clear_selection();
        }
    }

    /// Active record, only if it belongs to the current run.
    pub fn active_day(&self) -> Option<&HistoryRecord> {
        let run = self.store.peek()?.id;
        self.selector
            .selection()
            .filter(|s| s.run == run)
            .map(|s| &s.record)
    }

    fn emit(&mut self, event: DashboardEvent) {
        if self.events.len() == EVENT_QUEUE_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    // ---- rendering ----

    /// Build the view state for one render pass.
    pub fn frame(&self) -> Frame {
        frame::build(
            self.phase,
            &self.theme,
            self.notice.as_ref(),
            self.store.peek(),
            self.active_day(),
        )
    }

    /// Bumped on every selection change, for front ends that poll instead of
    /// draining events.
    pub fn selection_version(&self) -> u64 {
        self.selector.version()
    }

    /// Take queued events, oldest first. At most [`EVENT_QUEUE_CAPACITY`]
    /// are kept between calls.
    pub fn drain_events(&mut self) -> Vec<DashboardEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::PanelBody;
    use crate::test_support::result_with_days;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned outcomes in order and records every call.
    #[derive(Default)]
    struct Scripted {
        outcomes: Mutex<VecDeque<Result<SimulationResult, SimulationError>>>,
        calls: Mutex<Vec<SimulationParams>>,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<SimulationResult, SimulationError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: Mutex::default(),
            }
        }

        fn calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SimulationBackend for Scripted {
        async fn run(
            &self,
            params: &SimulationParams,
        ) -> Result<SimulationResult, SimulationError> {
            self.calls.lock().unwrap().push(*params);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SimulationError::NetworkFailure("script exhausted".into())))
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(DashboardConfig::default())
    }

    fn superseding() -> Dashboard {
        Dashboard::new(DashboardConfig {
            resubmit: ResubmitPolicy::Supersede,
            ..DashboardConfig::default()
        })
    }

    fn server_error() -> SimulationError {
        SimulationError::ServerFailure {
            status: 500,
            body: "boom".into(),
        }
    }

    #[tokio::test]
    async fn default_run_fills_every_panel() {
        let backend = Scripted::new(vec![Ok(result_with_days(30))]);
        let mut dash = dashboard();
        assert_eq!(dash.phase(), Phase::Idle);

        let done = dash.submit(&backend).await.unwrap();
        assert_eq!(done, Completion::Committed(RunId(1)));
        assert_eq!(dash.phase(), Phase::Ready);
        assert_eq!(backend.calls.lock().unwrap()[0], SimulationParams::default());

        let snap = dash.store().peek().unwrap();
        let days: Vec<u32> = snap.history().iter().map(|r| r.day).collect();
        assert_eq!(days, (1..=30).collect::<Vec<_>>());
        assert!(snap
            .history()
            .windows(2)
            .all(|w| w[1].stock_level <= w[0].stock_level));
        assert!(snap.summary().total_units_sold <= 3000);

        let frame = dash.frame();
        for panel in &frame.panels {
            assert!(panel.series().iter().all(|s| s.points.len() == 30));
        }
        let cards = frame.scoreboard.unwrap();
        assert!(cards[0].card.value.starts_with('$'));
    }

    #[tokio::test]
    async fn hovering_day_15_on_price_panel_drives_insight() {
        let backend = Scripted::new(vec![Ok(result_with_days(30))]);
        let mut dash = dashboard();
        dash.submit(&backend).await.unwrap();

        assert_eq!(dash.hover(PanelKind::PriceComparison, 14.0 / 29.0), Some(15));
        let frame = dash.frame();
        let expected = dash.store().peek().unwrap().record(15).unwrap().insight.clone();
        assert_eq!(frame.insight.text, expected);
        assert_eq!(frame.insight.day, Some(15));
        assert_eq!(frame.active_day, Some(15));
        for panel in &frame.panels {
            assert_eq!(panel.highlight_day(), Some(15), "{:?}", panel.kind);
        }
    }

    #[tokio::test]
    async fn last_hover_wins_across_panels() {
        let backend = Scripted::new(vec![Ok(result_with_days(30))]);
        let mut dash = dashboard();
        dash.submit(&backend).await.unwrap();

        assert!(dash.hover_day(PanelKind::MarketShare, 4));
        assert!(dash.hover_day(PanelKind::InventorySales, 22));
        assert_eq!(dash.active_day().unwrap().day, 22);
        assert!(!dash.hover_day(PanelKind::MarketShare, 99));
        assert_eq!(dash.active_day().unwrap().day, 22);
    }

    #[tokio::test]
    async fn new_run_clears_selection() {
        let backend = Scripted::new(vec![Ok(result_with_days(30)), Ok(result_with_days(30))]);
        let mut dash = dashboard();
        dash.submit(&backend).await.unwrap();
        dash.hover_day(PanelKind::PriceComparison, 10);
        dash.submit(&backend).await.unwrap();

        assert!(dash.active_day().is_none());
        let frame = dash.frame();
        assert!(frame.panels.iter().all(|p| p.highlight_day().is_none()));
        assert!(frame.insight.is_placeholder());
        assert!(dash
            .drain_events()
            .contains(&DashboardEvent::SelectionChanged(None)));
    }

    #[test]
    fn older_response_arriving_last_is_discarded() {
        let mut dash = superseding();
        let first = dash.begin_run().unwrap();
        let second = dash.begin_run().unwrap();
        assert!(second.ticket > first.ticket);

        let mut newer = result_with_days(30);
        newer.summary.total_profit = 999.0;
        assert_eq!(dash.complete_run(second, Ok(newer)), Completion::Committed(RunId(2)));
        assert_eq!(dash.complete_run(first, Ok(result_with_days(5))), Completion::Discarded);

        let snap = dash.store().peek().unwrap();
        assert_eq!(snap.id, RunId(2));
        assert_eq!(snap.history().len(), 30);
        assert_eq!(snap.summary().total_profit, 999.0);
        assert_eq!(dash.phase(), Phase::Ready);
    }

    #[test]
    fn older_response_arriving_first_is_discarded() {
        let mut dash = superseding();
        let first = dash.begin_run().unwrap();
        let second = dash.begin_run().unwrap();

        assert_eq!(dash.complete_run(first, Ok(result_with_days(5))), Completion::Discarded);
        assert!(dash.store().is_empty());
        assert_eq!(dash.phase(), Phase::Running { ticket: second.ticket });

        dash.complete_run(second, Ok(result_with_days(30)));
        assert_eq!(dash.store().peek().unwrap().history().len(), 30);
        assert_eq!(dash.store().replacements(), 1);
    }

    #[test]
    fn submit_while_running_is_ignored_by_default() {
        let mut dash = dashboard();
        let req = dash.begin_run().unwrap();
        assert_eq!(dash.begin_run(), Err(SubmitRejected::AlreadyRunning));
        assert_eq!(dash.phase(), Phase::Running { ticket: req.ticket });
        assert_eq!(
            dash.complete_run(req, Ok(result_with_days(3))),
            Completion::Committed(RunId(1))
        );
    }

    #[tokio::test]
    async fn failure_keeps_previous_data() {
        let backend = Scripted::new(vec![
            Ok(result_with_days(30)),
            Err(server_error()),
            Err(SimulationError::NetworkFailure("refused".into())),
        ]);
        let mut dash = dashboard();
        dash.submit(&backend).await.unwrap();
        dash.hover_day(PanelKind::ProfitComparison, 7);
        let before = dash.store().current().unwrap();

        let done = dash.submit(&backend).await.unwrap();
        assert_eq!(done, Completion::Failed(ErrorKind::Server));
        assert_eq!(dash.phase(), Phase::Failed);
        assert_eq!(dash.notice().unwrap().kind, ErrorKind::Server);
        let after = dash.store().current().unwrap();
        assert!(std::sync::Arc::ptr_eq(&before, &after));
        assert_eq!(dash.active_day().unwrap().day, 7);

        let done = dash.submit(&backend).await.unwrap();
        assert_eq!(done, Completion::Failed(ErrorKind::Network));
        assert_eq!(dash.store().replacements(), 1);

        let frame = dash.frame();
        assert!(frame.notice.is_some());
        assert!(frame.panels.iter().all(|p| !p.is_placeholder()));

        dash.dismiss_notice();
        assert_eq!(dash.phase(), Phase::Ready);
        assert!(dash.notice().is_none());
    }

    #[tokio::test]
    async fn first_run_failure_returns_to_idle_on_dismiss() {
        let backend = Scripted::new(vec![Err(server_error()), Ok(result_with_days(2))]);
        let mut dash = dashboard();
        dash.submit(&backend).await.unwrap();
        assert!(dash.frame().panels.iter().all(|p| p.is_placeholder()));
        dash.dismiss_notice();
        assert_eq!(dash.phase(), Phase::Idle);

        // Retry stays available.
        assert_eq!(dash.submit(&backend).await.unwrap(), Completion::Committed(RunId(2)));
    }

    #[tokio::test]
    async fn unordered_history_from_any_backend_is_malformed() {
        let mut bad = result_with_days(3);
        bad.history.swap(0, 2);
        let backend = Scripted::new(vec![Ok(bad)]);
        let mut dash = dashboard();
        let done = dash.submit(&backend).await.unwrap();
        assert_eq!(done, Completion::Failed(ErrorKind::MalformedResponse));
        assert!(dash.store().is_empty());
    }

    #[tokio::test]
    async fn invalid_params_never_reach_backend() {
        let backend = Scripted::new(vec![Ok(result_with_days(3))]);
        let mut dash = dashboard();
        dash.edit_param(ParamField::InitialPrice, "0").unwrap();
        let err = dash.submit(&backend).await.unwrap_err();
        assert_eq!(err, SubmitRejected::Invalid(ValidationError::NonPositivePrice));
        assert_eq!(backend.calls(), 0);
        assert_eq!(dash.phase(), Phase::Idle);
        assert_eq!(dash.notice().unwrap().kind, ErrorKind::Validation);

        assert!(dash.edit_param(ParamField::BaseDemand, "lots").is_err());
        assert_eq!(dash.params().base_demand, 200.0);
    }

    #[test]
    fn set_params_rejects_nan() {
        let mut dash = dashboard();
        let mut p = SimulationParams::default();
        p.sensitivity = f64::NAN;
        assert!(dash.set_params(p).is_err());
        assert_eq!(dash.params().sensitivity, 2.5);
    }

    #[tokio::test]
    async fn hover_payload_must_match_current_run() {
        let backend = Scripted::new(vec![Ok(result_with_days(30))]);
        let mut dash = dashboard();
        assert!(!dash.hover_payload(PanelKind::MarketShare, &serde_json::json!({})));
        dash.submit(&backend).await.unwrap();

        let rec = dash.store().peek().unwrap().record(9).unwrap().clone();
        let payload = serde_json::json!({ "activePayload": [{ "payload": rec }] });
        assert!(dash.hover_payload(PanelKind::MarketShare, &payload));
        assert_eq!(dash.active_day().unwrap().day, 9);

        let mut forged = rec.clone();
        forged.day = 10;
        let payload = serde_json::to_value(&forged).unwrap();
        assert!(!dash.hover_payload(PanelKind::PriceComparison, &payload));
        assert_eq!(dash.active_day().unwrap().day, 9);
    }

    #[tokio::test]
    async fn pointer_leave_clears_only_when_configured() {
        let backend = Scripted::new(vec![Ok(result_with_days(5)), Ok(result_with_days(5))]);
        let mut dash = dashboard();
        dash.submit(&backend).await.unwrap();
        dash.hover_day(PanelKind::PriceComparison, 2);
        dash.pointer_left();
        assert!(dash.active_day().is_some());

        let mut dash = Dashboard::new(DashboardConfig {
            clear_on_pointer_leave: true,
            ..DashboardConfig::default()
        });
        dash.submit(&backend).await.unwrap();
        dash.hover_day(PanelKind::PriceComparison, 2);
        dash.pointer_left();
        assert!(dash.active_day().is_none());
    }

    #[tokio::test]
    async fn every_panel_sees_the_same_day_in_one_frame() {
        let backend = Scripted::new(vec![Ok(result_with_days(30))]);
        let mut dash = dashboard();
        dash.submit(&backend).await.unwrap();
        for (i, kind) in PanelKind::ALL.into_iter().enumerate() {
            let day = (i as u32 + 1) * 6;
            assert!(dash.hover_day(kind, day));
            let frame = dash.frame();
            for panel in &frame.panels {
                let PanelBody::Chart { highlight_day, .. } = &panel.body else {
                    panic!("expected chart");
                };
                assert_eq!(*highlight_day, Some(day));
            }
        }
    }

    #[test]
    fn undrained_event_queue_is_bounded() {
        let mut dash = dashboard();
        for _ in 0..EVENT_QUEUE_CAPACITY + 10 {
            dash.toggle_theme();
        }
        let events = dash.drain_events();
        assert_eq!(events.len(), EVENT_QUEUE_CAPACITY);
        // 266 toggles end on light; the newest event is kept.
        assert_eq!(events.last(), Some(&DashboardEvent::ThemeChanged(ThemeMode::Light)));
    }

    #[tokio::test]
    async fn selection_version_tracks_hovers_and_clears() {
        let backend = Scripted::new(vec![Ok(result_with_days(5)), Ok(result_with_days(5))]);
        let mut dash = dashboard();
        dash.submit(&backend).await.unwrap();
        let v0 = dash.selection_version();
        dash.hover_day(PanelKind::MarketShare, 3);
        assert_eq!(dash.selection_version(), v0 + 1);
        assert!(!dash.hover_day(PanelKind::MarketShare, 40));
        assert_eq!(dash.selection_version(), v0 + 1);
        dash.submit(&backend).await.unwrap();
        assert_eq!(dash.selection_version(), v0 + 2);
    }

    #[test]
    fn events_follow_lifecycle() {
        let mut dash = superseding();
        let a = dash.begin_run().unwrap();
        let b = dash.begin_run().unwrap();
        dash.complete_run(a, Ok(result_with_days(2)));
        dash.complete_run(b, Ok(result_with_days(2)));
        dash.toggle_theme();
        assert_eq!(
            dash.drain_events(),
            vec![
                DashboardEvent::RunStarted(a.ticket),
                DashboardEvent::RunStarted(b.ticket),
                DashboardEvent::StaleDiscarded(a.ticket),
                DashboardEvent::RunCommitted { run: RunId(2), days: 2 },
                DashboardEvent::ThemeChanged(ThemeMode::Dark),
            ]
        );
        assert!(dash.drain_events().is_empty());
    }
}
