use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    CSV_FILE_NAME, ExportError, InvalidInputError, RawInputs, Schedule, ScheduleInputs,
    ScheduleSession, YearRecord, build_csv, format_money, parse_inputs, render_table,
    run_schedule,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Parser, Debug)]
#[command(
    name = "compound",
    about = "Compound interest schedule with partial reinvestment of earned interest"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the calculator page and its JSON/CSV API
    Serve {
        #[arg(long, short, default_value_t = 8080)]
        port: u16,
    },
    /// Print a schedule table and optionally export it as CSV
    Schedule(ScheduleArgs),
}

/// Values are taken as text so they go through the same parsing as the form.
#[derive(Args, Debug, Clone)]
pub struct ScheduleArgs {
    #[arg(long, default_value = "3000", allow_hyphen_values = true)]
    pub principal: String,
    #[arg(
        long,
        default_value = "5",
        allow_hyphen_values = true,
        help = "Annual interest rate in percent, e.g. 5; negative values model a loss"
    )]
    pub rate: String,
    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    pub years: String,
    #[arg(
        long,
        default_value = "100",
        allow_hyphen_values = true,
        help = "Share of each year's interest added back to the balance, 0 to 10000 percent"
    )]
    pub reinvest_percent: String,
    #[arg(long, help = "Write the schedule as CSV to this path")]
    pub csv: Option<PathBuf>,
    #[arg(long, help = "Print CSV to stdout instead of the table")]
    pub csv_only: bool,
}

impl ScheduleArgs {
    fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            principal: self.principal.clone(),
            annual_rate_percent: self.rate.clone(),
            years: self.years.clone(),
            reinvest_percent: self.reinvest_percent.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Input(#[from] InvalidInputError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("failed to write {}: {source}", path.display())]
    WriteFile { path: PathBuf, source: io::Error },
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

pub fn run_schedule_command(args: &ScheduleArgs, out: &mut dyn Write) -> Result<(), CommandError> {
    let mut session = ScheduleSession::new();
    let schedule = session.calculate(&args.raw_inputs())?;
    debug!(years = schedule.years.len(), "schedule computed");

    if args.csv_only {
        writeln!(out, "{}", session.export_csv()?)?;
    } else {
        let table = session
            .latest()
            .map(render_table)
            .ok_or(ExportError::NothingToExport)?;
        write!(out, "{table}")?;
    }

    if let Some(path) = &args.csv {
        let csv = session.export_csv()?;
        std::fs::write(path, csv).map_err(|source| CommandError::WriteFile {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote CSV export");
    }
    Ok(())
}

/// A form value arriving either as a JSON number or as free text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SchedulePayload {
    principal: Option<FieldValue>,
    #[serde(alias = "annualRatePercent")]
    rate: Option<FieldValue>,
    years: Option<FieldValue>,
    #[serde(alias = "reinvest")]
    reinvest_percent: Option<FieldValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormattedYear {
    opening_balance: String,
    interest_earned: String,
    reinvested_amount: String,
    closing_balance: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct YearResponse {
    #[serde(flatten)]
    record: YearRecord,
    formatted: FormattedYear,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormattedSummary {
    final_balance: String,
    total_interest_earned: String,
    total_reinvested: String,
    total_withdrawn: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    final_balance: f64,
    total_interest_earned: f64,
    total_reinvested: f64,
    total_withdrawn: f64,
    formatted: FormattedSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleResponse {
    inputs: ScheduleInputs,
    years: Vec<YearResponse>,
    summary: SummaryResponse,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn raw_inputs_from_payload(payload: SchedulePayload) -> RawInputs {
    let mut raw = RawInputs::from(ScheduleInputs::default());

    if let Some(v) = payload.principal {
        raw.principal = v.into_text();
    }
    if let Some(v) = payload.rate {
        raw.annual_rate_percent = v.into_text();
    }
    if let Some(v) = payload.years {
        raw.years = v.into_text();
    }
    if let Some(v) = payload.reinvest_percent {
        raw.reinvest_percent = v.into_text();
    }

    raw
}

#[cfg(test)]
fn schedule_from_json(json: &str) -> Result<Schedule, String> {
    let payload = serde_json::from_str::<SchedulePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    compute_from_payload(payload).map_err(|e| e.to_string())
}

fn compute_from_payload(payload: SchedulePayload) -> Result<Schedule, InvalidInputError> {
    let inputs = parse_inputs(&raw_inputs_from_payload(payload))?;
    Ok(run_schedule(&inputs))
}

fn build_schedule_response(schedule: &Schedule) -> ScheduleResponse {
    let years = schedule
        .years
        .iter()
        .map(|record| YearResponse {
            record: *record,
            formatted: FormattedYear {
                opening_balance: format_money(record.opening_balance),
                interest_earned: format_money(record.interest_earned),
                reinvested_amount: format_money(record.reinvested_amount),
                closing_balance: format_money(record.closing_balance),
            },
        })
        .collect();

    let summary = &schedule.summary;
    ScheduleResponse {
        inputs: schedule.inputs,
        years,
        summary: SummaryResponse {
            final_balance: summary.final_balance,
            total_interest_earned: summary.total_interest_earned,
            total_reinvested: summary.total_reinvested,
            total_withdrawn: summary.total_withdrawn(),
            formatted: FormattedSummary {
                final_balance: format_money(summary.final_balance),
                total_interest_earned: format_money(summary.total_interest_earned),
                total_reinvested: format_money(summary.total_reinvested),
                total_withdrawn: format_money(summary.total_withdrawn()),
            },
        },
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/defaults", get(defaults_handler))
        .route(
            "/api/schedule",
            get(schedule_get_handler).post(schedule_post_handler),
        )
        .route(
            "/api/schedule.csv",
            get(csv_get_handler).post(csv_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("compound interest calculator listening on http://{addr}");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, router()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn defaults_handler() -> Response {
    json_response(StatusCode::OK, ScheduleInputs::default())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn schedule_get_handler(query: Result<Query<SchedulePayload>, QueryRejection>) -> Response {
    match query {
        Ok(Query(payload)) => schedule_handler_impl(payload),
        Err(rejection) => malformed_request(rejection.status(), rejection.body_text()),
    }
}

async fn schedule_post_handler(body: Result<Json<SchedulePayload>, JsonRejection>) -> Response {
    match body {
        Ok(Json(payload)) => schedule_handler_impl(payload),
        Err(rejection) => malformed_request(rejection.status(), rejection.body_text()),
    }
}

fn schedule_handler_impl(payload: SchedulePayload) -> Response {
    match compute_from_payload(payload) {
        Ok(schedule) => {
            debug!(years = schedule.years.len(), "schedule computed");
            json_response(StatusCode::OK, build_schedule_response(&schedule))
        }
        Err(err) => rejected(err),
    }
}

async fn csv_get_handler(query: Result<Query<SchedulePayload>, QueryRejection>) -> Response {
    match query {
        Ok(Query(payload)) => csv_handler_impl(payload),
        Err(rejection) => malformed_request(rejection.status(), rejection.body_text()),
    }
}

async fn csv_post_handler(body: Result<Json<SchedulePayload>, JsonRejection>) -> Response {
    match body {
        Ok(Json(payload)) => csv_handler_impl(payload),
        Err(rejection) => malformed_request(rejection.status(), rejection.body_text()),
    }
}

fn csv_handler_impl(payload: SchedulePayload) -> Response {
    let schedule = match compute_from_payload(payload) {
        Ok(schedule) => schedule,
        Err(err) => return rejected(err),
    };
    match build_csv(&schedule.years) {
        Ok(csv) => {
            debug!(years = schedule.years.len(), "schedule exported as CSV");
            with_cache_control((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{CSV_FILE_NAME}\""),
                    ),
                ],
                csv,
            ))
        }
        Err(err) => {
            warn!(%err, "CSV export failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

fn malformed_request(status: StatusCode, msg: String) -> Response {
    warn!(%status, %msg, "malformed schedule request");
    error_response(status, &msg)
}

fn rejected(err: InvalidInputError) -> Response {
    warn!(field = %err.field(), %err, "rejected schedule inputs");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
