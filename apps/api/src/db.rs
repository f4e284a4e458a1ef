use std::time::Duration;

use anyhow::{Context, Result};
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, ReadPreference, SelectionCriteria};
use mongodb::Client;
use tracing::info;

/// Upper bound on the whole connect-and-ping attempt.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connects to MongoDB and verifies the primary answers a ping.
/// No retry: the first failure is returned to the caller.
pub async fn connect(dsn: &str) -> Result<Client> {
    info!("Connecting to MongoDB...");

    let client = tokio::time::timeout(CONNECT_TIMEOUT, open_and_ping(dsn))
        .await
        .with_context(|| format!("MongoDB did not answer within {CONNECT_TIMEOUT:?}"))??;

    info!("MongoDB connection established");
    Ok(client)
}

async fn open_and_ping(dsn: &str) -> Result<Client> {
    let mut options = ClientOptions::parse(dsn)
        .await
        .context("Invalid MongoDB connection string")?;
    options.connect_timeout = Some(CONNECT_TIMEOUT);
    options.server_selection_timeout = Some(CONNECT_TIMEOUT);

    let client = Client::with_options(options).context("Failed to create MongoDB client")?;
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary))
        .await
        .context("MongoDB ping failed")?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_malformed_dsn() {
        let err = connect("not-a-mongodb-url").await.unwrap_err();
        assert!(err.to_string().contains("Invalid MongoDB connection string"));
    }
}
