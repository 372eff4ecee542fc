use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::Client;

/// Build a Bedrock runtime client pinned to `region`, with credentials from
/// the default provider chain.
pub async fn build_client_with_region(region: &str) -> Client {
    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&config)
}
