//! Report delivery by email

use async_trait::async_trait;
use lettre::{
    Message, Transport, message::Mailbox, transport::smtp::SmtpTransport,
    transport::smtp::authentication::Credentials,
};
use tokio::task;

use crate::Result;
use crate::config::EmailConfig;
use crate::error::DroneWeatherError;
use crate::models::FlightSafetyReport;

/// Consumer of finished reports
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the report; returns whether anything was actually sent.
    async fn notify(&self, report: &FlightSafetyReport) -> Result<bool>;
}

/// Sends a plain-text email on flyable days only
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    #[must_use]
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Build the email for a report without sending it
    pub fn build_message(&self, report: &FlightSafetyReport) -> Result<Message> {
        let from = format!("DroneWeather <{}>", self.config.from)
            .parse::<Mailbox>()
            .map_err(|e| DroneWeatherError::notification(format!("Invalid from address: {e}")))?;
        let to = self
            .config
            .to
            .parse::<Mailbox>()
            .map_err(|e| DroneWeatherError::notification(format!("Invalid to address: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(format!("Good Day for Drone Flying in {}", report.location.name))
            .body(report.to_string())
            .map_err(|e| DroneWeatherError::notification(format!("Failed to build email: {e}")))
    }

    fn create_mailer(&self) -> Result<SmtpTransport> {
        let credentials =
            Credentials::new(self.config.username.clone(), self.config.password.clone());

        let mailer = SmtpTransport::starttls_relay(&self.config.smtp_server)
            .map_err(|e| DroneWeatherError::notification(format!("Invalid SMTP relay: {e}")))?
            .port(self.config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(mailer)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, report: &FlightSafetyReport) -> Result<bool> {
        if !report.flyable {
            tracing::info!("Not flyable, no email sent");
            return Ok(false);
        }

        let email = self.build_message(report)?;
        let mailer = self.create_mailer()?;

        task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| DroneWeatherError::notification(format!("Email task failed: {e}")))?
            .map_err(|e| DroneWeatherError::notification(format!("Failed to send email: {e}")))?;

        tracing::info!("Sent flight report email to {}", self.config.to);

        Ok(true)
    }
}
