//! External API integrations

pub mod alert_webhook;
pub mod archive;

pub use alert_webhook::{AlertPayload, AlertWebhookClient};
pub use archive::ArchiveClient;
