use std::time::Duration;

use hostelhub_config::Settings;
use mongodb::{Client, Database, options::ClientOptions};
use tracing::info;

pub async fn connect(settings: &Settings) -> Result<Database, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(&settings.database.url).await?;
    client_options.app_name = Some("hostelhub".to_string());
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = settings.database.max_pool_size;
    client_options.min_pool_size = settings.database.min_pool_size;

    let client = Client::with_options(client_options)?;

    client
        .database("admin")
        .run_command(bson::doc! { "ping": 1 })
        .await?;

    info!(
        db = %settings.database.name,
        max_pool = ?settings.database.max_pool_size,
        "Connected to MongoDB"
    );

    Ok(client.database(&settings.database.name))
}
