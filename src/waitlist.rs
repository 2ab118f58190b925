use aws_config::BehaviorVersion;
use lambda_http::{run, service_fn, Error as LambdaError, Request as LambdaRequest};
use tracing::{error, info};

use waitlist::notify::ResendNotifier;
use waitlist::store::DynamoStore;
use waitlist::{Config, Waitlist};

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .without_time() // CloudWatch will add the ingestion time
        .with_target(false)
        .init();

    let config = Config::from_env();
    if !config.missing().is_empty() {
        error!(
            "Missing required environment variables for waitlist handler: {}",
            config.missing().join(", ")
        );
    }
    info!("Starting waitlist handler: {:?}", config);

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let dynamo_client = aws_sdk_dynamodb::Client::new(&aws_config);

    let waitlist = Waitlist::new(
        Box::new(DynamoStore::new(dynamo_client, &config.table_name)),
        Box::new(ResendNotifier::from_config(reqwest::Client::new(), &config)),
        &config.hash_salt,
    );

    run(service_fn(|request: LambdaRequest| async {
        Result::<_, LambdaError>::Ok(waitlist.handle(request).await)
    }))
    .await
}
