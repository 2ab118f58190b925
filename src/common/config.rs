use std::fmt;

use crate::common::RESEND_API_URL_DEFAULT;

const TABLE_NAME_VAR: &str = "WAITLIST_TABLE_NAME";
const EMAIL_FROM_VAR: &str = "EMAIL_FROM";
const RESEND_API_KEY_VAR: &str = "RESEND_API_KEY";
const HASH_SALT_VAR: &str = "HASH_SALT";
const RESEND_API_URL_VAR: &str = "RESEND_API_URL";

/// Process-wide settings, read once at cold start.
#[derive(Clone)]
pub struct Config {
    pub table_name: String,
    pub email_from: String,
    pub resend_api_key: String,
    pub resend_api_url: String,
    pub hash_salt: String,
    missing: Vec<&'static str>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset or empty required keys are
    /// recorded in [`Config::missing`] and left empty.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |key: &'static str| match lookup(key).filter(|val| !val.is_empty()) {
            Some(val) => val,
            None => {
                missing.push(key);
                String::new()
            }
        };

        let table_name = required(TABLE_NAME_VAR);
        let email_from = required(EMAIL_FROM_VAR);
        let resend_api_key = required(RESEND_API_KEY_VAR);
        let hash_salt = required(HASH_SALT_VAR);
        let resend_api_url = lookup(RESEND_API_URL_VAR)
            .filter(|val| !val.is_empty())
            .unwrap_or(RESEND_API_URL_DEFAULT.into());

        Self {
            table_name,
            email_from,
            resend_api_key,
            resend_api_url,
            hash_salt,
            missing,
        }
    }

    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("table_name", &self.table_name)
            .field("email_from", &self.email_from)
            .field("resend_api_key", &"<redacted>")
            .field("resend_api_url", &self.resend_api_url)
            .field("hash_salt", &"<redacted>")
            .field("missing", &self.missing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("WAITLIST_TABLE_NAME", "signups"),
            ("EMAIL_FROM", "hello@example.com"),
            ("RESEND_API_KEY", "re_123"),
            ("HASH_SALT", "pepper"),
            ("RESEND_API_URL", "http://localhost:9999/emails"),
        ]));

        assert!(config.missing().is_empty());
        assert_eq!(config.table_name, "signups");
        assert_eq!(config.email_from, "hello@example.com");
        assert_eq!(config.resend_api_key, "re_123");
        assert_eq!(config.hash_salt, "pepper");
        assert_eq!(config.resend_api_url, "http://localhost:9999/emails");
    }

    #[test]
    fn missing_variables_are_reported_not_fatal() {
        let config = Config::from_lookup(lookup(&[("EMAIL_FROM", "hello@example.com"), ("HASH_SALT", "")]));

        assert_eq!(
            config.missing(),
            &["WAITLIST_TABLE_NAME", "RESEND_API_KEY", "HASH_SALT"]
        );
        assert_eq!(config.table_name, "");
        assert_eq!(config.resend_api_url, RESEND_API_URL_DEFAULT);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::from_lookup(lookup(&[
            ("RESEND_API_KEY", "re_secret"),
            ("HASH_SALT", "pepper"),
        ]));
        let printed = format!("{:?}", config);

        assert!(!printed.contains("re_secret"));
        assert!(!printed.contains("pepper"));
    }
}
