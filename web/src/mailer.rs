//! Booking confirmation email delivery.
//!
//! The mailer runs after the booking transaction has committed, from a
//! detached task. A delivery failure is logged and never affects the
//! booking itself.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use staybook_core::config::SmtpConfig;
use staybook_core::types::Booking;
use staybook_core::{Error, Result};

/// Sends booking confirmations.
///
/// Implementations are synchronous; callers run them on the blocking pool
/// via `tokio::task::spawn_blocking`.
pub trait Mailer: Send + Sync {
    /// Send a booking confirmation to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailDelivery`] when the message cannot be built
    /// or handed to the transport.
    fn send_booking_confirmation(
        &self,
        to: &str,
        recipient_name: &str,
        booking: &Booking,
        hotel_name: &str,
    ) -> Result<()>;
}

/// SMTP mailer using Lettre, suitable for production use.
#[derive(Clone)]
pub struct SmtpMailer {
    /// SMTP server address.
    server: String,

    /// SMTP server port.
    port: u16,

    /// SMTP credentials.
    credentials: Credentials,

    /// Sender address, e.g. `Staybook <noreply@staybook.example>`.
    from: String,
}

impl SmtpMailer {
    /// Create a new SMTP mailer from configuration.
    #[must_use]
    pub fn new(config: &SmtpConfig) -> Self {
        Self {
            server: config.server.clone(),
            port: config.port,
            credentials: Credentials::new(config.username.clone(), config.password.clone()),
            from: format!("{} <{}>", config.from_name, config.from_email),
        }
    }

    /// Build a transport for a single send.
    ///
    /// A fresh transport per email avoids holding pooled SMTP connections
    /// across long idle stretches.
    fn build_transport(&self) -> Result<SmtpTransport> {
        let relay = SmtpTransport::relay(&self.server).map_err(|e| {
            tracing::error!(error = %e, server = %self.server, "SMTP relay setup failed");
            Error::EmailDelivery
        })?;
        Ok(relay
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }
}

impl Mailer for SmtpMailer {
    fn send_booking_confirmation(
        &self,
        to: &str,
        recipient_name: &str,
        booking: &Booking,
        hotel_name: &str,
    ) -> Result<()> {
        let html_body = confirmation_body(recipient_name, booking, hotel_name);

        let email = Message::builder()
            .from(self.from.parse().map_err(|e| {
                tracing::error!(error = %e, "Invalid from address");
                Error::EmailDelivery
            })?)
            .to(to.parse().map_err(|e| {
                tracing::error!(error = %e, "Invalid to address");
                Error::EmailDelivery
            })?)
            .subject(format!("Your booking at {hotel_name} is confirmed"))
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to build confirmation email");
                Error::EmailDelivery
            })?;

        let transport = self.build_transport()?;
        transport.send(&email).map_err(|e| {
            tracing::error!(error = %e, booking_id = %booking.id, "Failed to send confirmation");
            Error::EmailDelivery
        })?;

        tracing::info!(booking_id = %booking.id, "Confirmation email sent");
        Ok(())
    }
}

/// Mailer that logs instead of sending, for development and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMailer;

impl Mailer for ConsoleMailer {
    fn send_booking_confirmation(
        &self,
        to: &str,
        recipient_name: &str,
        booking: &Booking,
        hotel_name: &str,
    ) -> Result<()> {
        tracing::info!(
            to = %to,
            recipient = %recipient_name,
            booking_id = %booking.id,
            hotel = %hotel_name,
            total_price = booking.total_price,
            earned_points = booking.earned_points,
            "Booking confirmation (console mailer)"
        );
        Ok(())
    }
}

fn confirmation_body(recipient_name: &str, booking: &Booking, hotel_name: &str) -> String {
    format!(
        r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Booking confirmed</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #2563eb;">Booking confirmed</h2>
        <p>Hi {recipient_name},</p>
        <p>Your stay at <strong>{hotel_name}</strong> is confirmed.</p>
        <ul>
            <li>Check-in: {check_in}</li>
            <li>Check-out: {check_out}</li>
            <li>Rooms: {rooms}</li>
            <li>Total: {total_price}</li>
            <li>Loyalty points earned: {earned_points}</li>
        </ul>
        <p style="color: #666; font-size: 14px;">
            Booking reference: {booking_id}
        </p>
    </div>
</body>
</html>
        "#,
        check_in = booking.check_in,
        check_out = booking.check_out,
        rooms = booking.rooms,
        total_price = booking.total_price,
        earned_points = booking.earned_points,
        booking_id = booking.id,
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::{NaiveDate, Utc};
    use staybook_core::types::{BookingId, HotelId, UserId};

    fn sample_booking() -> Booking {
        Booking {
            id: BookingId::new(),
            user_id: UserId::new(),
            hotel_id: HotelId::new(),
            check_in: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 10, 4).unwrap(),
            rooms: 2,
            total_price: 250_000,
            earned_points: 25,
            redemption_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn console_mailer_always_succeeds() {
        let booking = sample_booking();
        let result =
            ConsoleMailer.send_booking_confirmation("guest@example.com", "Guest", &booking, "Test Hotel");
        assert!(result.is_ok());
    }

    #[test]
    fn confirmation_body_includes_stay_details() {
        let booking = sample_booking();
        let body = confirmation_body("Guest", &booking, "Test Hotel");
        assert!(body.contains("Test Hotel"));
        assert!(body.contains("2026-10-01"));
        assert!(body.contains("250000"));
    }
}
