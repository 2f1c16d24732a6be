//! Plain-text rendering of a dashboard frame.

use std::fmt::Write;

use dashboard::panels::format_field_value;
use dashboard::{Frame, PanelBody, PanelView, Phase};
use sim_contract::{ParamField, SimulationParams};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Unicode sparkline scaled to the series' own range.
pub fn sparkline(values: &[f64]) -> String {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = hi - lo;
    values
        .iter()
        .map(|v| {
            if !v.is_finite() {
                ' '
            } else if span <= 0.0 {
                BARS[0]
            } else {
                let idx = ((v - lo) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            }
        })
        .collect()
}

/// One-line echo of the submitted parameters.
pub fn params_line(params: &SimulationParams) -> String {
    let fields: Vec<String> = ParamField::ALL
        .into_iter()
        .map(|f| format!("{f} {}", params.get(f)))
        .collect();
    format!("Params | {}", fields.join(" | "))
}

fn phase_label(phase: Phase) -> String {
    match phase {
        Phase::Idle => "idle".into(),
        Phase::Running { ticket } => format!("running ({ticket})"),
        Phase::Ready => "ready".into(),
        Phase::Failed => "failed".into(),
    }
}

fn panel(out: &mut String, view: &PanelView) -> std::fmt::Result {
    writeln!(out, "[{}]", view.title)?;
    match &view.body {
        PanelBody::Placeholder { message } => writeln!(out, "  {message}"),
        PanelBody::Chart {
            series,
            y_domain,
            tooltip,
            ..
        } => {
            if let Some((lo, hi)) = y_domain {
                writeln!(out, "  y {lo:.2} .. {hi:.2}")?;
            }
            for s in series {
                let values: Vec<f64> = s.points.iter().map(|p| p.value).collect();
                let last = values.last().copied().unwrap_or(f64::NAN);
                writeln!(
                    out,
                    "  {:<12} {}  last {}",
                    s.label,
                    sparkline(&values),
                    format_field_value(s.field, last)
                )?;
            }
            if let Some(tip) = tooltip {
                let rows: Vec<String> = tip
                    .rows
                    .iter()
                    .map(|r| format!("{} {}", r.label, r.value))
                    .collect();
                writeln!(out, "  > day {}: {}", tip.day, rows.join(" | "))?;
                if let Some(insight) = &tip.insight {
                    writeln!(out, "    {insight}")?;
                }
            }
            Ok(())
        }
    }
}

/// Render the whole frame.
pub fn frame(f: &Frame) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let run = f.run.map(|r| r.to_string()).unwrap_or_else(|| "no run".into());
    writeln!(
        out,
        "Pricing simulation | {run} | {} | theme {:?}",
        phase_label(f.phase),
        f.theme.mode
    )?;
    if let Some(notice) = &f.notice {
        writeln!(out, "! {:?}: {}", notice.kind, notice.message)?;
    }
    if let Some(cards) = &f.scoreboard {
        writeln!(out)?;
        for c in cards {
            writeln!(
                out,
                "  {:<13} {:>14}  {}",
                c.card.label,
                c.card.value,
                sparkline(&c.sparkline_values)
            )?;
        }
    }
    if let Some(r) = &f.rollup {
        writeln!(
            out,
            "  advantage {} | lead {} | sell-through {} | stock-out {} | ASP {}",
            r.profit_advantage, r.lead_over_competitor, r.sell_through, r.stockout, r.realized_asp
        )?;
    }
    for view in &f.panels {
        writeln!(out)?;
        panel(&mut out, view)?;
    }
    writeln!(out)?;
    match f.insight.day {
        Some(day) => writeln!(out, "Insight (day {day}): {}", f.insight.text)?,
        None => writeln!(out, "Insight: {}", f.insight.text)?,
    }
    Ok(out)
}
