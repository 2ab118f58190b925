use lambda_http::http::header::USER_AGENT;
use lambda_http::http::HeaderMap;
use lambda_http::request::RequestContext;
use lambda_http::{Request, RequestExt};
use sha2::{Digest, Sha256};

use crate::common::UNKNOWN_SOURCE_IP;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Who sent a request, as far as the gateway can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub source_ip: String,
    pub user_agent: String,
}

impl ClientIdentity {
    pub fn from_request(request: &Request) -> Self {
        let context_ip = request.request_context_ref().and_then(context_source_ip);
        Self::resolve(context_ip, request.headers())
    }

    /// Prefers the gateway-reported address, then the first `X-Forwarded-For` hop,
    /// then [`UNKNOWN_SOURCE_IP`].
    pub fn resolve(context_ip: Option<&str>, headers: &HeaderMap) -> Self {
        let forwarded_ip = headers
            .get(FORWARDED_FOR)
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.split(',').next())
            .map(str::trim);

        let source_ip = context_ip
            .filter(|ip| !ip.is_empty())
            .or(forwarded_ip.filter(|ip| !ip.is_empty()))
            .unwrap_or(UNKNOWN_SOURCE_IP)
            .to_string();

        let user_agent = headers
            .get(USER_AGENT)
            .and_then(|val| val.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Self {
            source_ip,
            user_agent,
        }
    }

    pub fn ip_hash(&self, salt: &str) -> String {
        hash_ip(&self.source_ip, salt)
    }
}

fn context_source_ip(context: &RequestContext) -> Option<&str> {
    match context {
        RequestContext::ApiGatewayV1(ctx) => ctx.identity.source_ip.as_deref(),
        RequestContext::ApiGatewayV2(ctx) => ctx.http.source_ip.as_deref(),
        _ => None,
    }
}

/// Hex SHA-256 of `salt:ip`. Deterministic, and useless without the salt.
pub fn hash_ip(ip: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}", salt, ip).as_bytes());
    hex::encode(hasher.finalize())
}
