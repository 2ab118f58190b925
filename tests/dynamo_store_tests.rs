use aws_sdk_dynamodb::config::retry::RetryConfig;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use serde_json::json;
use waitlist::common::{Signup, Status};
use waitlist::store::{DynamoStore, InsertOutcome, SignupStore, StoreError};
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLE: &str = "signups";
const AMZ_JSON: &str = "application/x-amz-json-1.0";

fn store(server: &MockServer) -> DynamoStore {
    let config = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("eu-west-3"))
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .endpoint_url(server.uri())
        .retry_config(RetryConfig::disabled())
        .build();

    DynamoStore::new(aws_sdk_dynamodb::Client::from_conf(config), TABLE)
}

fn signup(email: &str) -> Signup {
    Signup {
        email: email.into(),
        name: Some("Ada".into()),
        utm: None,
        referer: None,
        user_agent: Some("Mozilla/5.0".into()),
        ip_hash: "f00d".into(),
        timezone: None,
        locale: Some("fr-FR".into()),
        consent_marketing: Some(true),
        status: Status::Pending,
        created_at: "2026-10-16T10:00:00.000Z".into(),
        updated_at: "2026-10-16T10:00:00.000Z".into(),
    }
}

fn dynamo_error(status: u16, kind: &str) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .insert_header("content-type", AMZ_JSON)
        .set_body_string(
            json!({
                "__type": format!("com.amazonaws.dynamodb.v20120810#{}", kind),
                "message": "rejected by test server",
            })
            .to_string(),
        )
}

#[tokio::test]
async fn test_put_is_conditional_on_missing_email() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("x-amz-target", "DynamoDB_20120810.PutItem"))
        .and(body_partial_json(json!({
            "TableName": TABLE,
            "ConditionExpression": "attribute_not_exists(email)",
            "Item": {
                "email": {"S": "a@b.com"},
                "status": {"S": "pending"},
                "utm": {"NULL": true},
                "consent_marketing": {"BOOL": true},
            },
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", AMZ_JSON)
                .set_body_string("{}"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = store(&mock_server).insert_if_absent(&signup("a@b.com")).await;

    assert!(matches!(result, Ok(InsertOutcome::Inserted)), "{:?}", result);
}

#[tokio::test]
async fn test_conditional_check_failure_is_already_exists() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(dynamo_error(400, "ConditionalCheckFailedException"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = store(&mock_server).insert_if_absent(&signup("a@b.com")).await;

    assert!(matches!(result, Ok(InsertOutcome::AlreadyExists)), "{:?}", result);
}

#[tokio::test]
async fn test_other_service_errors_propagate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(dynamo_error(400, "ResourceNotFoundException"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = store(&mock_server).insert_if_absent(&signup("a@b.com")).await;

    assert!(matches!(result, Err(StoreError::PutItem(_))), "{:?}", result);
}

#[tokio::test]
async fn test_server_failure_propagates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(dynamo_error(500, "InternalServerError"))
        .mount(&mock_server)
        .await;

    let result = store(&mock_server).insert_if_absent(&signup("a@b.com")).await;

    assert!(matches!(result, Err(StoreError::PutItem(_))), "{:?}", result);
}
