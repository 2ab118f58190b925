use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

pub mod config;
pub mod errors;
pub mod utils;

pub const RESEND_API_URL_DEFAULT: &str = "https://api.resend.com/emails";

/// Placeholder used when neither the gateway nor a proxy reports a caller address.
pub const UNKNOWN_SOURCE_IP: &str = "0.0.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
        }
    }
}

/// One waitlist registration, keyed by its normalized email.
#[derive(Debug, Clone, PartialEq)]
pub struct Signup {
    pub email: String,
    pub name: Option<String>,
    /// Campaign attribution, kept as JSON text.
    pub utm: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub ip_hash: String,
    pub timezone: Option<String>,
    pub locale: Option<String>,
    pub consent_marketing: Option<bool>,
    pub status: Status,
    pub created_at: String,
    pub updated_at: String,
}

fn string_or_null(value: Option<String>) -> AttributeValue {
    match value {
        Some(val) => AttributeValue::S(val),
        None => AttributeValue::Null(true),
    }
}

impl From<Signup> for HashMap<String, AttributeValue> {
    fn from(value: Signup) -> Self {
        let consent_marketing = match value.consent_marketing {
            Some(val) => AttributeValue::Bool(val),
            None => AttributeValue::Null(true),
        };

        HashMap::from([
            ("email".into(), AttributeValue::S(value.email)),
            ("name".into(), string_or_null(value.name)),
            ("utm".into(), string_or_null(value.utm)),
            ("referer".into(), string_or_null(value.referer)),
            ("user_agent".into(), string_or_null(value.user_agent)),
            ("ip_hash".into(), AttributeValue::S(value.ip_hash)),
            ("timezone".into(), string_or_null(value.timezone)),
            ("locale".into(), string_or_null(value.locale)),
            ("consent_marketing".into(), consent_marketing),
            ("status".into(), AttributeValue::S(value.status.as_str().into())),
            ("created_at".into(), AttributeValue::S(value.created_at)),
            ("updated_at".into(), AttributeValue::S(value.updated_at)),
        ])
    }
}
