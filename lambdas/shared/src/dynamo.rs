//! DynamoDB operations for Berkeley Mobile
//!
//! Single-table design with the following key patterns:
//!
//! | PK                          | SK                    | Purpose              |
//! |-----------------------------|-----------------------|----------------------|
//! | CATEGORY#{collection}       | PLACE#{name}          | Place document       |
//! | USER#{uid}                  | PROFILE               | User record          |

use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_item};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::errors::{Error, Result};
use crate::models::*;

const PLACE_PREFIX: &str = "PLACE#";
const PROFILE_SK: &str = "PROFILE";

type Item = HashMap<String, AttributeValue>;

fn category_pk(category: Category) -> String {
    format!("CATEGORY#{}", category.collection())
}

fn place_sk(name: &str) -> String {
    format!("{}{}", PLACE_PREFIX, name)
}

fn user_pk(uid: &str) -> String {
    format!("USER#{}", uid)
}

/// Drop the table keys so they don't leak into the document's extra fields
fn strip_keys(mut item: Item) -> Item {
    item.remove("PK");
    item.remove("SK");
    item
}

fn place_from_item(item: Item) -> Result<Place> {
    from_item(strip_keys(item)).map_err(|e| Error::DynamoSerialization(e.to_string()))
}

/// DynamoDB client for Berkeley Mobile operations
#[derive(Clone)]
pub struct DynamoClient {
    client: Client,
    table_name: String,
}

impl DynamoClient {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    // =========================================================================
    // Place Operations
    // =========================================================================

    /// List every place in a category
    pub async fn list_places(&self, category: Category) -> Result<Vec<Place>> {
        let mut places = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let result = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("PK = :pk AND begins_with(SK, :prefix)")
                .expression_attribute_values(":pk", AttributeValue::S(category_pk(category)))
                .expression_attribute_values(":prefix", AttributeValue::S(PLACE_PREFIX.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| Error::Database(e.to_string()))?;

            for item in result.items.unwrap_or_default() {
                match place_from_item(item) {
                    Ok(place) => places.push(place),
                    Err(e) => warn!(category = %category, error = %e, "Skipping malformed place"),
                }
            }

            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        debug!(category = %category, count = places.len(), "Listed places");
        Ok(places)
    }

    /// Get a place by its exact name
    pub async fn get_place(&self, category: Category, name: &str) -> Result<Place> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(category_pk(category)))
            .key("SK", AttributeValue::S(place_sk(name)))
            .send()
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        match result.item {
            Some(item) => place_from_item(item),
            None => Err(Error::PlaceNotFound(name.to_string())),
        }
    }

    /// Create or replace a place
    pub async fn put_place(&self, category: Category, place: &Place) -> Result<()> {
        let mut item: Item = to_item(place).map_err(|e| Error::DynamoSerialization(e.to_string()))?;
        item.insert("PK".to_string(), AttributeValue::S(category_pk(category)));
        item.insert("SK".to_string(), AttributeValue::S(place_sk(&place.name)));

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Get a user record, if the user has logged in before
    pub async fn get_user(&self, uid: &str) -> Result<Option<User>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(user_pk(uid)))
            .key("SK", AttributeValue::S(PROFILE_SK.to_string()))
            .send()
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        match result.item {
            Some(item) => Ok(Some(
                from_item(strip_keys(item)).map_err(|e| Error::DynamoSerialization(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    /// Create a user record
    pub async fn create_user(&self, user: &User) -> Result<()> {
        let mut item: Item = to_item(user).map_err(|e| Error::DynamoSerialization(e.to_string()))?;
        item.insert("PK".to_string(), AttributeValue::S(user_pk(&user.uid)));
        item.insert("SK".to_string(), AttributeValue::S(PROFILE_SK.to_string()));

        // Use condition to prevent overwriting an existing refresh token
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await
            .map_err(|e| {
                let conflict = e
                    .as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception());
                if conflict {
                    Error::UserAlreadyExists(user.uid.clone())
                } else {
                    Error::Database(e.to_string())
                }
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_formats() {
        assert_eq!(category_pk(Category::DiningHall), "CATEGORY#Dining Halls");
        assert_eq!(category_pk(Category::CampusResource), "CATEGORY#Campus Resource");
        assert_eq!(place_sk("Crossroads"), "PLACE#Crossroads");
        assert_eq!(user_pk("abc123"), "USER#abc123");
    }

    #[test]
    fn test_place_from_item_strips_keys() {
        let mut item: Item = HashMap::new();
        item.insert("PK".into(), AttributeValue::S(category_pk(Category::Gym)));
        item.insert("SK".into(), AttributeValue::S(place_sk("RSF")));
        item.insert("name".into(), AttributeValue::S("RSF".into()));
        item.insert("latitude".into(), AttributeValue::N("37.8686".into()));
        item.insert("longitude".into(), AttributeValue::N("-122.2627".into()));
        item.insert("website".into(), AttributeValue::S("https://recsports.berkeley.edu".into()));

        let place = place_from_item(item).unwrap();
        assert_eq!(place.name, "RSF");
        assert_eq!(place.latitude, Some(37.8686));
        assert!(!place.extra.contains_key("PK"));
        assert!(!place.extra.contains_key("SK"));
        assert_eq!(place.extra["website"], "https://recsports.berkeley.edu");
    }

    #[test]
    fn test_place_item_round_trip_keeps_hours() {
        let place = Place::new("Doe Library").with_hours(vec![OpenClose::new(100, 200)]);
        let item: Item = to_item(&place).unwrap();
        assert!(item.contains_key("open_close_array"));
        assert!(!item.contains_key("phone"));

        let back = place_from_item(item).unwrap();
        assert_eq!(back, place);
    }
}
