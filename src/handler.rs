use chrono::{SecondsFormat, Utc};
use lambda_http::http::{Method, StatusCode};
use lambda_http::{Request, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::common::errors::Error;
use crate::common::utils::{
    empty_response, extract_request, internal_error_response, json_response, lenient,
    rejection, text_response,
};
use crate::common::{Signup, Status};
use crate::identity::ClientIdentity;
use crate::notify::Notifier;
use crate::store::{InsertOutcome, SignupStore};
use crate::validation::{clean_optional, non_empty, validate_email};

pub const REGISTERED_MESSAGE: &str = "registered";

/// Submitted form. Fields of the wrong type read as absent, so only the email
/// decides whether a well-formed body is accepted.
#[derive(Debug, Default, Deserialize)]
pub struct WaitlistRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    /// Kept as sent, whatever its shape.
    #[serde(default)]
    pub utm: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub referer: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub locale: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub consent_marketing: Option<bool>,
}

#[derive(Debug, Serialize)]
struct WaitlistResponse {
    ok: bool,
    message: &'static str,
}

/// The `/waitlist` endpoint: a store for signups, a notifier for the confirmation
/// email, and the salt used to hash caller addresses.
pub struct Waitlist {
    store: Box<dyn SignupStore>,
    notifier: Box<dyn Notifier>,
    hash_salt: String,
}

impl Waitlist {
    pub fn new(
        store: Box<dyn SignupStore>,
        notifier: Box<dyn Notifier>,
        hash_salt: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            hash_salt: hash_salt.into(),
        }
    }

    /// Entry point. Never fails: unexpected errors become a generic 500.
    #[tracing::instrument(skip_all, fields(method = %request.method()))]
    pub async fn handle(&self, request: Request) -> Response<String> {
        let result = match request.method() {
            &Method::OPTIONS => empty_response(StatusCode::OK),
            &Method::POST => self.process_request(&request).await,
            _ => text_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
        };

        match result {
            Ok(val) => val,
            Err(Error::HttpError(val)) => val,
            Err(err) => {
                error!("Waitlist request failed: {}", err);
                internal_error_response()
            }
        }
    }

    async fn process_request(&self, request: &Request) -> Result<Response<String>, Error> {
        let payload = extract_request::<WaitlistRequest>(request)?;

        let email = match validate_email(payload.email.as_deref().unwrap_or_default()) {
            Ok(val) => val,
            Err(err) => {
                info!("Rejected signup: {}", err);
                return Err(rejection(err)?);
            }
        };

        let identity = ClientIdentity::from_request(request);
        let signup = build_signup(email, payload, &identity, &self.hash_salt)?;

        match self.store.insert_if_absent(&signup).await? {
            InsertOutcome::Inserted => info!("Signup stored"),
            InsertOutcome::AlreadyExists => info!("Duplicate signup ignored"),
        }

        if let Err(err) = self.notifier.send_confirmation(&signup.email).await {
            error!("Confirmation email failed: {}", err);
        }

        json_response(
            StatusCode::OK,
            &WaitlistResponse {
                ok: true,
                message: REGISTERED_MESSAGE,
            },
        )
    }
}

/// Assembles the record for an already validated email, stamped with the current time.
pub fn build_signup(
    email: String,
    payload: WaitlistRequest,
    identity: &ClientIdentity,
    hash_salt: &str,
) -> Result<Signup, Error> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let utm = payload
        .utm
        .filter(|utm| !utm.is_null())
        .map(|utm| serde_json::to_string(&utm))
        .transpose()?;
    let user_agent = Some(identity.user_agent.clone()).filter(|val| !val.is_empty());

    Ok(Signup {
        email,
        name: clean_optional(payload.name),
        utm,
        referer: non_empty(payload.referer),
        user_agent,
        ip_hash: identity.ip_hash(hash_salt),
        timezone: non_empty(payload.timezone),
        locale: non_empty(payload.locale),
        consent_marketing: payload.consent_marketing,
        status: Status::Pending,
        created_at: now.clone(),
        updated_at: now,
    })
}
