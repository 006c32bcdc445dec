use std::sync::Arc;

use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use tracing::{info, warn};

use crate::config::Config;
use crate::db::{memory_store::InMemoryPollStore, mongo_store::MongoPollStore, poll_store::PollStore};
use crate::utils::error::{AppError, AppResult};

pub async fn init_db(mongo_uri: &str, db_name: &str) -> AppResult<Database> {
    let mut client_options = ClientOptions::parse(mongo_uri)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse MongoDB URI: {}", e)))?;

    client_options.app_name = Some("PollingApp".to_string());

    let client = Client::with_options(client_options)
        .map_err(|e| AppError::DatabaseError(format!("Failed to initialize MongoDB client: {}", e)))?;

    let db = client.database(db_name);
    db.run_command(doc! { "ping": 1 }).await?;

    info!(db_name, "Database connection successful");
    Ok(db)
}

pub async fn init_store(config: &Config) -> AppResult<Arc<dyn PollStore>> {
    match &config.mongo_uri {
        Some(mongo_uri) => {
            let db = init_db(mongo_uri, &config.db_name).await?;
            let store = MongoPollStore::new(&db);
            store.ensure_indexes().await?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("MONGO_URI not set, polls will be kept in memory and lost on restart");
            Ok(Arc::new(InMemoryPollStore::new()))
        }
    }
}
