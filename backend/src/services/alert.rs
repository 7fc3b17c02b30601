//! Critical alert dispatch
//!
//! Critical alerts (heat, frost, drought) are always logged and, when a
//! webhook is configured, POSTed to it. Delivery failures never fail the
//! prediction that produced the alerts.

use shared::AgroClimaticPrediction;

use crate::config::AlertConfig;
use crate::error::AppResult;
use crate::external::{AlertPayload, AlertWebhookClient};

#[derive(Clone)]
pub struct AlertDispatcher {
    enabled: bool,
    webhook: Option<AlertWebhookClient>,
}

/// What happened to a prediction's critical alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    NothingToSend,
    Disabled,
    Logged,
    Delivered,
    DeliveryFailed,
}

impl AlertDispatcher {
    pub fn new(config: &AlertConfig) -> AppResult<Self> {
        let webhook = match config.webhook_url.as_deref() {
            Some(url) if !url.is_empty() => Some(AlertWebhookClient::new(url)?),
            _ => None,
        };
        Ok(Self {
            enabled: config.enabled,
            webhook,
        })
    }

    /// Log-only dispatcher
    pub fn log_only() -> Self {
        Self {
            enabled: true,
            webhook: None,
        }
    }

    pub async fn dispatch(&self, prediction: &AgroClimaticPrediction) -> DispatchOutcome {
        let critical = prediction.critical_alerts();
        if critical.is_empty() {
            return DispatchOutcome::NothingToSend;
        }
        if !self.enabled {
            tracing::debug!(
                "Alert dispatch disabled; {} critical alerts for prediction {} not sent",
                critical.len(),
                prediction.id
            );
            return DispatchOutcome::Disabled;
        }

        for alert in &critical {
            tracing::warn!(
                "Critical alert for {} on {}: {}",
                prediction.location.label(),
                prediction.date,
                alert
            );
        }

        let Some(webhook) = self.webhook.as_ref() else {
            return DispatchOutcome::Logged;
        };

        let payload = AlertPayload {
            prediction_id: prediction.id,
            location: prediction.location.clone(),
            date: prediction.date,
            alerts: critical.iter().map(|a| a.to_string()).collect(),
        };

        match webhook.send(&payload).await {
            Ok(()) => DispatchOutcome::Delivered,
            Err(e) => {
                tracing::error!("Failed to deliver alerts for prediction {}: {}", prediction.id, e);
                DispatchOutcome::DeliveryFailed
            }
        }
    }
}
