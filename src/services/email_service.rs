use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::models::booking::Booking;

/// Fire-and-forget mailer. Every send happens on a spawned task; failures
/// are logged and never fail or roll back the request that triggered them.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
    admin_email: Option<String>,
    agency_email: Option<String>,
}

impl EmailService {
    pub fn from_env() -> Self {
        let server = std::env::var("SMTP_SERVER").ok();
        let username = std::env::var("SMTP_USERNAME").ok();
        let password = std::env::var("SMTP_PASSWORD").ok();
        let from = std::env::var("SMTP_FROM")
            .ok()
            .and_then(|addr| addr.parse::<Mailbox>().ok());

        let transport = match (server, username, password) {
            (Some(server), Some(username), Some(password)) => {
                let port: u16 = std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587);
                match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&server) {
                    Ok(builder) => Some(
                        builder
                            .port(port)
                            .credentials(Credentials::new(username, password))
                            .build(),
                    ),
                    Err(e) => {
                        log::error!("Invalid SMTP configuration: {}", e);
                        None
                    }
                }
            }
            _ => {
                log::warn!("SMTP not configured; notification emails will be skipped");
                None
            }
        };

        Self {
            transport,
            from,
            admin_email: std::env::var("ADMIN_EMAIL").ok(),
            agency_email: std::env::var("AGENCY_EMAIL").ok(),
        }
    }

    /// Notifications fired on the pending -> paid transition. The caller
    /// gates this on the transition actually happening, so a duplicate
    /// gateway callback never produces a second round of mail.
    pub fn notify_payment_confirmed(&self, booking: &Booking) {
        if let Some(contact) = &booking.contact {
            self.dispatch(
                &contact.email,
                format!("Payment received for booking {}", booking_ref(booking)),
                payment_confirmation_html(booking),
            );
        }
        if let Some(admin) = self.admin_email.clone() {
            self.dispatch(
                &admin,
                format!("Booking {} paid", booking_ref(booking)),
                admin_notification_html(booking),
            );
        }
        if booking.transport.is_some() {
            if let Some(agency) = self.agency_email.clone() {
                self.dispatch(
                    &agency,
                    format!("Driver assignment needed for booking {}", booking_ref(booking)),
                    agency_assignment_html(booking),
                );
            }
        }
    }

    pub fn send_booking_confirmation(&self, booking: &Booking) {
        if let Some(contact) = &booking.contact {
            self.dispatch(
                &contact.email,
                format!("Booking {} received", booking_ref(booking)),
                booking_confirmation_html(booking),
            );
        }
    }

    fn dispatch(&self, to: &str, subject: String, html: String) {
        let (Some(transport), Some(from)) = (&self.transport, &self.from) else {
            log::warn!("SMTP not configured; skipping email '{}'", subject);
            return;
        };

        let to_mailbox: Mailbox = match to.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                log::error!("Invalid recipient address '{}': {}", to, e);
                return;
            }
        };

        let message = Message::builder()
            .from(from.clone())
            .to(to_mailbox)
            .subject(&subject)
            .header(ContentType::TEXT_HTML)
            .body(html);

        let message = match message {
            Ok(message) => message,
            Err(e) => {
                log::error!("Failed to build email '{}': {}", subject, e);
                return;
            }
        };

        let transport = transport.clone();
        tokio::spawn(async move {
            if let Err(e) = transport.send(message).await {
                log::error!("Failed to send email '{}': {}", subject, e);
            }
        });
    }
}

fn booking_ref(booking: &Booking) -> String {
    booking
        .id
        .map(|id| id.to_hex())
        .unwrap_or_else(|| "unsaved".to_string())
}

fn guest_name(booking: &Booking) -> &str {
    booking
        .contact
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("Guest")
}

fn booking_confirmation_html(booking: &Booking) -> String {
    format!(
        "<h2>Namaste {}!</h2>\
         <p>We have received your booking <b>{}</b>.</p>\
         <p>Total: &#8377;{:.2} &mdash; payable: &#8377;{:.2}</p>\
         <p>Your booking will be confirmed once payment is complete.</p>\
         <p>Kshetra Retreat Resort, Varkala</p>",
        guest_name(booking),
        booking_ref(booking),
        booking.total_amount,
        booking.final_amount,
    )
}

fn payment_confirmation_html(booking: &Booking) -> String {
    format!(
        "<h2>Namaste {}!</h2>\
         <p>Your payment of &#8377;{:.2} for booking <b>{}</b> is confirmed.</p>\
         <p>Payment reference: {}</p>\
         <p>We look forward to welcoming you.</p>\
         <p>Kshetra Retreat Resort, Varkala</p>",
        guest_name(booking),
        booking.final_amount,
        booking_ref(booking),
        booking.payment_id.as_deref().unwrap_or("-"),
    )
}

fn admin_notification_html(booking: &Booking) -> String {
    format!(
        "<h3>Booking {} paid</h3>\
         <p>Guest: {} ({} guests)</p>\
         <p>Amount received: &#8377;{:.2}</p>",
        booking_ref(booking),
        guest_name(booking),
        booking.total_guests,
        booking.final_amount,
    )
}

fn agency_assignment_html(booking: &Booking) -> String {
    let flight = booking
        .transport
        .as_ref()
        .and_then(|t| t.flight_number.as_deref())
        .unwrap_or("-");
    format!(
        "<h3>Driver assignment request</h3>\
         <p>Booking {} includes an airport transport component.</p>\
         <p>Guest: {}, flight: {}</p>",
        booking_ref(booking),
        guest_name(booking),
        flight,
    )
}
