//! AWS Lambda handler for rentability simulations
//!
//! Accepts a `RentabilityRequest` JSON body through a Lambda Function URL and
//! returns the flattened `RentabilityResponse`.

use aws_lambda_events::event::lambda_function_urls::{
    LambdaFunctionUrlRequest, LambdaFunctionUrlResponse,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use rentability_engine::RentabilityRequest;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn json_response<T: Serialize>(status_code: i64, body: &T) -> LambdaFunctionUrlResponse {
    let body = serde_json::to_string(body).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e));
    let mut response = LambdaFunctionUrlResponse {
        status_code,
        headers: Default::default(),
        body: Some(body),
        is_base64_encoded: false,
        cookies: Vec::new(),
    };
    for (name, value) in [
        ("content-type", "application/json"),
        ("access-control-allow-origin", "*"),
    ] {
        if let Ok(value) = value.parse() {
            response.headers.insert(name, value);
        }
    }
    response
}

fn error_response(status_code: i64, message: &str) -> LambdaFunctionUrlResponse {
    json_response(status_code, &ErrorBody { error: message.to_string() })
}

/// Evaluate a request body
fn respond(body: Option<&str>, is_base64_encoded: bool) -> LambdaFunctionUrlResponse {
    if is_base64_encoded {
        return error_response(400, "Binary bodies are not supported, send JSON text");
    }

    let body = match body {
        Some(body) if !body.trim().is_empty() => body,
        _ => return error_response(400, "Missing request body"),
    };

    let request: RentabilityRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
    };

    let start = std::time::Instant::now();
    let response = request.evaluate();
    log::info!(
        "simulated {} years in {:?}, {} warnings",
        response.result.yearly_results.len(),
        start.elapsed(),
        response.warnings.len()
    );

    json_response(200, &response)
}

async fn handler(
    event: LambdaEvent<LambdaFunctionUrlRequest>,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let request = event.payload;
    Ok(respond(request.body.as_deref(), request.is_base64_encoded))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
