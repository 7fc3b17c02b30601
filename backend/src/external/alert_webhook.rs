//! Webhook delivery for critical weather alerts

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::Location;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Body POSTed to the alert webhook
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertPayload {
    pub prediction_id: Uuid,
    pub location: Location,
    pub date: NaiveDate,
    pub alerts: Vec<String>,
}

#[derive(Clone)]
pub struct AlertWebhookClient {
    client: Client,
    url: String,
}

impl AlertWebhookClient {
    pub fn new(url: impl Into<String>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Configuration(format!("Alert HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub async fn send(&self, payload: &AlertPayload) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::AlertDeliveryFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::AlertDeliveryFailed(format!(
                "webhook responded with {}",
                response.status()
            )));
        }
        Ok(())
    }
}
