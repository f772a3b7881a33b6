//! Fraud console entrypoint: analyze a CSV upload, watch the live feed, or
//! drive threshold and retraining on the scoring backend.

use fraud_console::{
    client::{poll_retrain, BackendClient, RETRAIN_STEPS},
    config::{ConfigSource, ConsoleConfig, CONFIG_PATH_ENV},
    error::ConsoleError,
    live::{run_live_feed, LiveFeed, RunnerOptions},
    logging::StructuredLogger,
    risk::{threshold_percent, ThresholdHint, TransactionSeverity},
    session::AnalysisSession,
    transactions::{schema, MockTrafficSource, ScoredTransaction, TransactionId},
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

type CmdResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn usage() -> String {
    format!(
        "usage: fraud-console <command>\n\n\
         commands:\n  \
         analyze <file.csv>   score a CSV upload and print its analytics\n  \
         live                 run the live feed until Ctrl+C\n  \
         threshold [value]    show or set the blocking threshold (0..1)\n  \
         retrain              retrain the model and follow progress\n  \
         dashboard            print the backend dashboard snapshot\n  \
         stats [reset]        show or reset backend service counters\n\n{}",
        schema::upload_help()
    )
}

#[derive(Serialize)]
struct TopBlockedRow<'a> {
    transaction_id: Option<&'a TransactionId>,
    amount: f64,
    score: f64,
    severity: TransactionSeverity,
}

impl<'a> From<&'a ScoredTransaction> for TopBlockedRow<'a> {
    fn from(tx: &'a ScoredTransaction) -> Self {
        Self {
            transaction_id: tx.transaction_id.as_ref(),
            amount: tx.amount,
            score: tx.score,
            severity: TransactionSeverity::from_score(tx.score),
        }
    }
}

async fn analyze(
    client: &BackendClient,
    config: &ConsoleConfig,
    path: &Path,
    out: &mut impl Write,
) -> CmdResult {
    let bytes = std::fs::read(path)?;
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    schema::validate_csv_header(&String::from_utf8_lossy(header))?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.csv".to_string());
    let prediction = client.predict_csv(&filename, bytes).await?;

    let mut session = AnalysisSession::new();
    let record = session.save(filename, prediction);
    let (id, filename, analyzed_at) = (record.id, record.filename.clone(), record.analyzed_at);
    let Some(analytics) = session.analytics(config.analytics.top_n) else {
        return Ok(());
    };
    info!(
        total = analytics.total,
        blocked = analytics.blocked_count,
        fraud_rate = analytics.fraud_rate,
        risk_level = analytics.risk_level.as_str(),
        "analysis complete"
    );
    let top: Vec<TopBlockedRow> = analytics.top_blocked.iter().map(TopBlockedRow::from).collect();
    StructuredLogger::emit_json(
        "analysis",
        &serde_json::json!({
            "id": id,
            "filename": filename,
            "analyzed_at": analyzed_at,
            "analytics": &analytics,
            "top_blocked_severity": top,
        }),
        out,
    )?;
    Ok(())
}

async fn live(client: &BackendClient, config: &ConsoleConfig, out: &mut impl Write) -> CmdResult {
    let (stop_tx, stop_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(true);
    })
    .map_err(|e| ConsoleError::Config(format!("ctrl-c handler: {e}")))?;

    let mut feed = LiveFeed::new(config.live.window);
    let mut source = MockTrafficSource::new();
    info!("live feed (Ctrl+C to stop)");
    let outcome = run_live_feed(
        &mut feed,
        Arc::new(client.clone()),
        &mut source,
        RunnerOptions::from(&config.live),
        stop_rx,
        |feed| {
            let latest: Vec<_> = feed.log().iter().take(3).collect();
            let line = serde_json::json!({
                "counters": feed.counters(),
                "pass_rate": feed.counters().pass_rate(),
                "latest": latest,
            });
            let written = StructuredLogger::emit_json("feed_batch", &line, &mut std::io::stdout());
            if let Err(e) = written {
                warn!(error = %e, "failed to write feed line");
            }
        },
    )
    .await;

    if let Err(e) = &outcome {
        error!(error = %e, "live feed stopped on failure");
    }
    StructuredLogger::emit_json(
        "feed_summary",
        &serde_json::json!({
            "counters": feed.counters(),
            "pass_rate": feed.counters().pass_rate(),
            "logged": feed.log().len(),
            "discarded": feed.discarded(),
            "last_error": feed.last_error(),
        }),
        out,
    )?;
    outcome.map_err(Into::into)
}

async fn threshold(client: &BackendClient, value: Option<&str>, out: &mut impl Write) -> CmdResult {
    if let Some(raw) = value {
        let t: f64 = raw
            .parse()
            .map_err(|_| ConsoleError::Validation(format!("not a number: {raw}")))?;
        client.set_threshold(t).await?;
    }
    let current = client.get_config().await?;
    let percent = threshold_percent(current.threshold);
    let hint = ThresholdHint::for_threshold(percent);
    StructuredLogger::emit_json(
        "threshold",
        &serde_json::json!({
            "threshold": current.threshold,
            "percent": percent,
            "hint": hint,
            "message": hint.message(percent),
        }),
        out,
    )?;
    Ok(())
}

async fn retrain(
    client: &BackendClient,
    config: &ConsoleConfig,
    out: &mut impl Write,
) -> CmdResult {
    client.start_retrain().await?;
    let last = poll_retrain(client, config.retrain.poll_interval(), |status, step| {
        let line = serde_json::json!({
            "status": status,
            "step": step,
            "step_label": RETRAIN_STEPS[step],
        });
        if let Err(e) = StructuredLogger::emit_json("retrain", &line, &mut std::io::stdout()) {
            warn!(error = %e, "failed to write retrain line");
        }
    })
    .await?;
    info!(status = ?last.status, message = %last.message, "retraining finished");
    StructuredLogger::emit_json("retrain_done", &last, out)?;
    Ok(())
}

#[tokio::main]
async fn main() -> CmdResult {
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let (config, source) = ConsoleConfig::load_with_source(&config_path);
    let config = config.with_env_overrides();

    StructuredLogger::init(config.log.json, &config.log.level);
    if let ConfigSource::Unreadable(reason) = &source {
        warn!(path = %config_path.display(), %reason, "config file unparseable; using defaults");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("{}", usage());
        std::process::exit(2);
    };

    let client = BackendClient::new(&config.api)?;
    info!(command, api = client.base_url(), "fraud console starting");
    let mut stdout = std::io::stdout();

    let result = match command {
        "analyze" => match args.get(1) {
            Some(path) => analyze(&client, &config, Path::new(path), &mut stdout).await,
            None => Err(ConsoleError::Validation("analyze needs a CSV path".into()).into()),
        },
        "live" => live(&client, &config, &mut stdout).await,
        "threshold" => threshold(&client, args.get(1).map(String::as_str), &mut stdout).await,
        "retrain" => retrain(&client, &config, &mut stdout).await,
        "dashboard" => match client.dashboard().await {
            Ok(snapshot) => {
                StructuredLogger::emit_json("dashboard", &snapshot, &mut stdout).map_err(Into::into)
            }
            Err(e) => Err(e.into()),
        },
        "stats" => {
            if args.get(1).map(String::as_str) == Some("reset") {
                if let Err(e) = client.reset_stats().await {
                    error!(error = %e, "stats reset failed");
                    return Err(e.into());
                }
            }
            match client.get_stats().await {
                Ok(stats) => {
                    StructuredLogger::emit_json("stats", &stats, &mut stdout).map_err(Into::into)
                }
                Err(e) => Err(e.into()),
            }
        }
        other => {
            eprintln!("unknown command: {other}\n\n{}", usage());
            std::process::exit(2);
        }
    };

    if let Err(e) = &result {
        error!(command, error = %e, "command failed");
    }
    result
}
