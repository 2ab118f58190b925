use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use tracing::info;

use crate::common::Signup;

const EMAIL_NOT_EXISTS: &str = "attribute_not_exists(email)";

/// What a conditional insert did. Failures travel as [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("dynamodb put_item failed: {0}")]
    PutItem(#[from] Box<SdkError<PutItemError>>),
    #[error("{0}")]
    Backend(String),
}

/// Create-only persistence for signups, keyed by normalized email.
#[async_trait]
pub trait SignupStore: Send + Sync {
    /// Writes `signup` unless a record with the same email exists. The check and the
    /// write are one atomic step, so concurrent inserts for one email have exactly
    /// one winner.
    async fn insert_if_absent(&self, signup: &Signup) -> Result<InsertOutcome, StoreError>;
}

#[async_trait]
impl<T: SignupStore + ?Sized> SignupStore for Arc<T> {
    async fn insert_if_absent(&self, signup: &Signup) -> Result<InsertOutcome, StoreError> {
        (**self).insert_if_absent(signup).await
    }
}

pub struct DynamoStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl SignupStore for DynamoStore {
    async fn insert_if_absent(&self, signup: &Signup) -> Result<InsertOutcome, StoreError> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(signup.clone().into()))
            .condition_expression(EMAIL_NOT_EXISTS)
            .send()
            .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(SdkError::ServiceError(val)) => match val.err() {
                PutItemError::ConditionalCheckFailedException(_) => {
                    info!("Signup already registered");
                    Ok(InsertOutcome::AlreadyExists)
                }
                _ => Err(Box::new(SdkError::ServiceError(val)).into()),
            },
            Err(err) => Err(Box::new(err).into()),
        }
    }
}
