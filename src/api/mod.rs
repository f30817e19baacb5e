use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{Inputs, Projection, TaxTable, YearSnapshot, run_projection};

#[derive(Parser, Debug)]
#[command(
    name = "immoplan",
    about = "Rental property investment projector (Austrian 2024 tax model)"
)]
struct Cli {
    #[arg(long, default_value_t = 60_000.0, help = "Annual gross income")]
    gross_income: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Existing monthly loan payments, deducted from the mortgage budget"
    )]
    existing_loan_payment: f64,
    #[arg(long, default_value_t = 450_000.0)]
    property_price: f64,
    #[arg(long, default_value_t = 90_000.0)]
    down_payment: f64,
    #[arg(
        long,
        default_value_t = 3.5,
        help = "Gross rental yield in percent of the purchase price"
    )]
    rental_yield: f64,
    #[arg(long, default_value_t = 25, help = "Loan term in years")]
    loan_term: u32,
    #[arg(long, default_value_t = 3.5, help = "Annual interest rate in percent")]
    interest_rate: f64,
    #[arg(
        long,
        default_value_t = 2.5,
        help = "Annual property appreciation in percent"
    )]
    property_appreciation: f64,
    #[arg(long, default_value_t = 2.0, help = "Annual rent increase in percent")]
    rent_increase: f64,
    #[arg(
        long,
        default_value_t = 5_000.0,
        help = "One-off purchase side costs (notary, fees)"
    )]
    additional_costs: f64,
    #[arg(
        long,
        default_value_t = 0,
        help = "Number of dependents eligible for the monthly tax credit"
    )]
    dependents: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    #[serde(alias = "annualGrossIncome")]
    gross_income: Option<f64>,
    existing_loan_payment: Option<f64>,
    property_price: Option<f64>,
    down_payment: Option<f64>,
    rental_yield: Option<f64>,
    loan_term: Option<u32>,
    interest_rate: Option<f64>,
    property_appreciation: Option<f64>,
    rent_increase: Option<f64>,
    additional_costs: Option<f64>,
    #[serde(alias = "numberOfChildren")]
    dependents: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    monthly_net_income: f64,
    available_monthly_payment: f64,
    max_property_price: f64,
    monthly_mortgage: f64,
    monthly_rent: f64,
    final_year: Option<YearSnapshot>,
    years: Vec<YearSnapshot>,
}

impl From<Projection> for SimulateResponse {
    fn from(projection: Projection) -> Self {
        Self {
            monthly_net_income: projection.monthly_net_income,
            available_monthly_payment: projection.available_monthly_payment,
            max_property_price: projection.max_property_price,
            monthly_mortgage: projection.monthly_mortgage,
            monthly_rent: projection.monthly_rent,
            final_year: projection.years.last().cloned(),
            years: projection.years,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<Inputs, String> {
    for (name, value) in [
        ("--gross-income", cli.gross_income),
        ("--existing-loan-payment", cli.existing_loan_payment),
        ("--property-price", cli.property_price),
        ("--down-payment", cli.down_payment),
        ("--additional-costs", cli.additional_costs),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be a finite number >= 0"));
        }
    }

    if !(1..=100).contains(&cli.loan_term) {
        return Err("--loan-term must be between 1 and 100".to_string());
    }

    if cli.down_payment > cli.property_price {
        return Err("--down-payment must be <= --property-price".to_string());
    }

    if !cli.rental_yield.is_finite() || cli.rental_yield < 0.0 {
        return Err("--rental-yield must be >= 0".to_string());
    }

    if !cli.interest_rate.is_finite() || cli.interest_rate < 0.0 {
        return Err("--interest-rate must be >= 0".to_string());
    }

    if !cli.property_appreciation.is_finite() || cli.property_appreciation <= -100.0 {
        return Err("--property-appreciation must be > -100".to_string());
    }

    if !cli.rent_increase.is_finite() || cli.rent_increase <= -100.0 {
        return Err("--rent-increase must be > -100".to_string());
    }

    Ok(Inputs {
        gross_income: cli.gross_income,
        existing_loan_payment: cli.existing_loan_payment,
        property_price: cli.property_price,
        down_payment: cli.down_payment,
        rental_yield: cli.rental_yield,
        loan_term: cli.loan_term,
        interest_rate: cli.interest_rate,
        property_appreciation: cli.property_appreciation,
        rent_increase: cli.rent_increase,
        additional_costs: cli.additional_costs,
        dependents: cli.dependents,
    })
}

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let inputs = build_inputs(cli)?;
    let table = TaxTable::austria_2024();
    let response = SimulateResponse::from(run_projection(&table, &inputs));
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| format!("Failed to serialize projection: {e}"))?;
    println!("{json}");
    Ok(())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("immoplan HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/simulate");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let table = TaxTable::austria_2024();
    let response = SimulateResponse::from(run_projection(&table, &inputs));
    json_response(StatusCode::OK, response)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<Inputs, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: SimulatePayload) -> Result<Inputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.gross_income {
        cli.gross_income = v;
    }
    if let Some(v) = payload.existing_loan_payment {
        cli.existing_loan_payment = v;
    }
    if let Some(v) = payload.property_price {
        cli.property_price = v;
    }
    if let Some(v) = payload.down_payment {
        cli.down_payment = v;
    }
    if let Some(v) = payload.rental_yield {
        cli.rental_yield = v;
    }
    if let Some(v) = payload.loan_term {
        cli.loan_term = v;
    }
    if let Some(v) = payload.interest_rate {
        cli.interest_rate = v;
    }
    if let Some(v) = payload.property_appreciation {
        cli.property_appreciation = v;
    }
    if let Some(v) = payload.rent_increase {
        cli.rent_increase = v;
    }
    if let Some(v) = payload.additional_costs {
        cli.additional_costs = v;
    }
    if let Some(v) = payload.dependents {
        cli.dependents = v;
    }

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        gross_income: 60_000.0,
        existing_loan_payment: 0.0,
        property_price: 450_000.0,
        down_payment: 90_000.0,
        rental_yield: 3.5,
        loan_term: 25,
        interest_rate: 3.5,
        property_appreciation: 2.5,
        rent_increase: 2.0,
        additional_costs: 5_000.0,
        dependents: 0,
    }
}
