//! In-process doubles for the store and the notifier, shared by unit and
//! integration tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lambda_http::{Body, Request};

use crate::common::Signup;
use crate::notify::{Notifier, NotifyError};
use crate::store::{InsertOutcome, SignupStore, StoreError};

/// First-write-wins map guarded by a single lock, mirroring a conditional put.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Signup>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, email: &str) -> Option<Signup> {
        self.lock().get(email).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Signup>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SignupStore for MemoryStore {
    async fn insert_if_absent(&self, signup: &Signup) -> Result<InsertOutcome, StoreError> {
        let mut records = self.lock();
        if records.contains_key(&signup.email) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        records.insert(signup.email.clone(), signup.clone());
        Ok(InsertOutcome::Inserted)
    }
}

/// Store whose every write fails, as an unreachable table would.
pub struct FailingStore;

#[async_trait]
impl SignupStore for FailingStore {
    async fn insert_if_absent(&self, _signup: &Signup) -> Result<InsertOutcome, StoreError> {
        Err(StoreError::Backend("table unavailable".into()))
    }
}

/// Notifier that records recipients, optionally failing every send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_confirmation(&self, to: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(to.to_string());

        if self.fail {
            return Err(NotifyError::Rejected {
                status: 503,
                body: "service unavailable".into(),
            });
        }
        Ok(())
    }
}

/// Builds a gateway request with the given method and raw body.
pub fn waitlist_request(method: &str, body: &str) -> Request {
    let mut request = Request::new(Body::from(body.to_string()));
    if let Ok(method) = method.parse() {
        *request.method_mut() = method;
    }
    *request.uri_mut() = lambda_http::http::Uri::from_static("/waitlist");
    request
}
