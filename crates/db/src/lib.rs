pub mod indexes;
pub mod models;

use mongodb::{Client, Database};
use speakscore_config::MongoSettings;
use tracing::info;

/// Connects to MongoDB and returns a handle to the configured database.
pub async fn connect(settings: &MongoSettings) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(&settings.uri).await?;
    let db = client.database(&settings.database);
    info!(database = %settings.database, "Connected to MongoDB");
    Ok(db)
}
