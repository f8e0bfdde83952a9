//! JSON message conversion
//!
//! Values cross the broker as JSON bodies tagged `application/json`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::broker::Delivery;
use crate::utils::error::ClientError;

pub const CONTENT_TYPE_JSON: &str = "application/json";

pub fn to_delivery<T: Serialize>(payload: &T) -> Result<Delivery, ClientError> {
    let body = serde_json::to_vec(payload)?;
    Ok(Delivery::new(CONTENT_TYPE_JSON, body))
}

pub fn from_delivery<T: DeserializeOwned>(delivery: &Delivery) -> Result<T, ClientError> {
    if delivery.content_type != CONTENT_TYPE_JSON {
        return Err(ClientError::UnsupportedContentType {
            content_type: delivery.content_type.clone(),
        });
    }
    Ok(serde_json::from_slice(&delivery.body)?)
}
