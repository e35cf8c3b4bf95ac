//! Load places into the table
//!
//! Usage: `seed-places <category> <places.json>`
//!
//! The file holds a JSON array of place documents. Existing places with the
//! same name are replaced.

use aws_config::BehaviorVersion;
use berkeley_mobile_core::{Category, Config, DynamoClient, Error, Place};
use tracing::info;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn parse_places(json: &str) -> Result<Vec<Place>, Error> {
    let places: Vec<Place> = serde_json::from_str(json)?;
    if let Some(unnamed) = places.iter().position(|p| p.name.trim().is_empty()) {
        return Err(Error::Validation(format!("place at index {} has no name", unnamed)));
    }
    Ok(places)
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(category), Some(file)) = (args.next(), args.next()) else {
        return Err("usage: seed-places <dining|gyms|libraries|resources> <places.json>".into());
    };

    let category: Category = category.parse()?;
    let places = parse_places(&std::fs::read_to_string(&file)?)?;

    let config = Config::from_env();
    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let db = DynamoClient::new(aws_sdk_dynamodb::Client::new(&aws), config.table_name.clone());

    for place in &places {
        db.put_place(category, place).await?;
    }

    info!(
        category = %category,
        table = %config.table_name,
        count = places.len(),
        "Seeded places"
    );
    Ok(())
}
