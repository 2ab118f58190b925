use lambda_http::http::header::{HeaderValue, CONTENT_TYPE};
use lambda_http::http::StatusCode;
use lambda_http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;

use crate::common::errors::{Error, ValidationError};

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json";

// Wide open until the landing page has a fixed origin.
const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-headers", "*"),
    ("access-control-allow-methods", "OPTIONS,POST"),
];

/// Decodes the JSON body regardless of the declared content type, rejecting with a
/// ready-made 400 when it is empty or malformed.
pub fn extract_request<T: DeserializeOwned>(request: &Request) -> Result<T, Error> {
    let body: &[u8] = request.body();
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(rejection(ValidationError::MissingBody)?);
    }

    match serde_json::from_slice::<T>(body) {
        Ok(val) => Ok(val),
        Err(err) => {
            info!("Malformed body: {}", err);
            Err(rejection(ValidationError::InvalidJson)?)
        }
    }
}

/// `deserialize_with` for optional payload fields: a value of the wrong type reads
/// as absent instead of failing the whole body.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Turns a validation failure into the `HttpError` carrying its 400 response.
pub fn rejection(err: ValidationError) -> Result<Error, Error> {
    let response = text_response(StatusCode::BAD_REQUEST, err.to_string())?;
    Ok(Error::HttpError(response))
}

pub fn text_response(status: StatusCode, body: impl Into<String>) -> Result<Response<String>, Error> {
    let response = with_cors(Response::builder())
        .status(status)
        .header(CONTENT_TYPE, TEXT_CONTENT_TYPE)
        .body(body.into())?;

    Ok(response)
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<String>, Error> {
    let response = with_cors(Response::builder())
        .status(status)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .body(serde_json::to_string(body)?)?;

    Ok(response)
}

pub fn empty_response(status: StatusCode) -> Result<Response<String>, Error> {
    let response = with_cors(Response::builder())
        .status(status)
        .body(String::new())?;

    Ok(response)
}

/// Last-resort 500 that cannot fail to build.
pub fn internal_error_response() -> Response<String> {
    let mut response = Response::new("Internal Server Error".to_string());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;

    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_CONTENT_TYPE));

    response
}

fn with_cors(builder: lambda_http::http::response::Builder) -> lambda_http::http::response::Builder {
    CORS_HEADERS
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(*name, *value))
}
