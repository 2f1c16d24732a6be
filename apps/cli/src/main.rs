#![deny(warnings)]

//! Headless dashboard: run one simulation and print the resulting frame.

mod render;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dashboard::{Completion, Dashboard, DashboardConfig, PanelKind, ThemeMode};
use sim_client::HttpSimulationClient;
use sim_contract::ParamField;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: pricing-dash [options]

  --config PATH          YAML configuration file
  --base-url URL         simulator base URL
  --timeout-ms N         request timeout
  --initial-price X      --cost-price X      --total-inventory N
  --base-demand X        --sensitivity X
  --hover-day N          highlight day N as if hovered on the price chart
  --theme light|dark
  --json                 print the frame as JSON
  --version";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    base_url: Option<String>,
    timeout_ms: Option<u64>,
    params: Vec<(ParamField, String)>,
    hover_day: Option<u32>,
    theme: Option<ThemeMode>,
    json: bool,
    version: bool,
    help: bool,
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    let mut it = raw.into_iter();
    while let Some(arg) = it.next() {
        let mut value = || it.next().with_context(|| format!("{arg} needs a value"));
        match arg.as_str() {
            "--config" => args.config = Some(value()?.into()),
            "--base-url" => args.base_url = Some(value()?),
            "--timeout-ms" => {
                args.timeout_ms = Some(value()?.parse().context("--timeout-ms")?);
            }
            "--hover-day" => args.hover_day = Some(value()?.parse().context("--hover-day")?),
            "--theme" => {
                args.theme = Some(match value()?.as_str() {
                    "light" => ThemeMode::Light,
                    "dark" => ThemeMode::Dark,
                    other => bail!("unknown theme {other:?}"),
                })
            }
            "--json" => args.json = true,
            "--version" => args.version = true,
            "-h" | "--help" => args.help = true,
            flag => {
                let field = flag
                    .strip_prefix("--")
                    .and_then(|k| k.replace('-', "_").parse::<ParamField>().ok());
                match field {
                    Some(field) => {
                        let v = value()?;
                        args.params.push((field, v));
                    }
                    None => bail!("unknown argument {flag:?}\n\n{USAGE}"),
                }
            }
        }
    }
    Ok(args)
}

fn load_config(args: &Args) -> Result<DashboardConfig> {
    let mut cfg = DashboardConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(url) = &args.base_url {
        cfg.simulator.base_url = url.clone();
    }
    if let Some(ms) = args.timeout_ms {
        cfg.simulator.timeout_ms = ms;
    }
    if let Some(mode) = args.theme {
        cfg.theme = mode;
    }
    cfg.validate().context("invalid command-line overrides")?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --json output stays parseable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    if args.version {
        println!(
            "pricing-dash {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }

    let cfg = load_config(&args)?;
    let client = HttpSimulationClient::new(&cfg.simulator)?;
    info!(endpoint = client.endpoint(), "starting pricing-dash");

    let mut dash = Dashboard::new(cfg);
    for (field, input) in &args.params {
        dash.edit_param(*field, input)
            .with_context(|| format!("--{}", field.key().replace('_', "-")))?;
    }

    let completion = dash.submit(&client).await?;
    if let Some(day) = args.hover_day {
        if !dash.hover_day(PanelKind::PriceComparison, day) {
            warn!(day, "requested hover day not in run");
        }
    }

    let frame = dash.frame();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    } else {
        println!("{}", render::params_line(dash.params()));
        print!("{}", render::frame(&frame)?);
    }

    if let Completion::Failed(kind) = completion {
        let message = dash.notice().map(|n| n.message.clone()).unwrap_or_default();
        bail!("simulation failed ({kind:?}): {message}");
    }
    Ok(())
}
