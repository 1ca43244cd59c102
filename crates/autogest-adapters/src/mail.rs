//! Aviso por correo (SMTP vía lettre).
//!
//! At-most-once: un intento por trámite, sin cola ni reintentos. El socket
//! tiene timeout acotado; su vencimiento cuenta como fallo de aviso.

use std::time::Duration;

use autogest_core::{Notification, NotificationFailure, Notifier};
use autogest_domain::Priority;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::debug;

pub const SUBJECT: &str = "AutoGest-Yau: Trámite Priorizado";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    /// `false` sólo para relays locales sin TLS.
    pub starttls: bool,
    pub timeout: Duration,
}

pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(cfg: &MailConfig) -> Result<Self, NotificationFailure> {
        let from: Mailbox = cfg.from
                               .parse()
                               .map_err(|e| NotificationFailure::InvalidAddress(format!("{}: {e}", cfg.from)))?;
        let builder = if cfg.starttls {
            SmtpTransport::starttls_relay(&cfg.host).map_err(|e| NotificationFailure::Transport(e.to_string()))?
        } else {
            SmtpTransport::builder_dangerous(&cfg.host)
        };
        let mut builder = builder.port(cfg.port).timeout(Some(cfg.timeout));
        if let (Some(user), Some(pass)) = (&cfg.username, &cfg.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        Ok(Self { transport: builder.build(),
                  from })
    }

    fn build_message(&self, notification: &Notification) -> Result<Message, NotificationFailure> {
        let to: Mailbox = notification.recipient
                                      .parse()
                                      .map_err(|e| NotificationFailure::InvalidAddress(format!("{}: {e}", notification.recipient)))?;
        Message::builder().from(self.from.clone())
                          .to(to)
                          .subject(SUBJECT)
                          .header(ContentType::TEXT_HTML)
                          .body(render_html(notification))
                          .map_err(|e| NotificationFailure::Message(e.to_string()))
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotificationFailure> {
        let message = self.build_message(notification)?;
        let response = self.transport
                           .send(&message)
                           .map_err(|e| NotificationFailure::Transport(e.to_string()))?;
        debug!("smtp accepted recipient={} code={}", notification.recipient, response.code());
        Ok(())
    }
}

/// Sin relay configurado: todo envío falla con `Disabled`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn send(&self, _notification: &Notification) -> Result<(), NotificationFailure> { Err(NotificationFailure::Disabled) }

    fn is_enabled(&self) -> bool { false }
}

fn tier_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "#d32f2f",
        Priority::Medium => "#f57c00",
        Priority::Low => "#388e3c",
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Cuerpo HTML del aviso; la prioridad va coloreada según el nivel.
pub fn render_html(notification: &Notification) -> String {
    format!(r#"<div style="font-family: Arial; max-width: 600px; margin: auto; border: 1px solid #ddd; padding: 20px;">
    <h2 style="color: #0d6efd;">Municipalidad de Yau</h2>
    <p><strong>DNI:</strong> {citizen}</p>
    <p><strong>Trámite:</strong> {document}</p>
    <p><strong>PRIORIDAD:</strong>
        <span style="color: {color}; font-weight: bold; font-size: 18px;">{priority}</span>
    </p>
    <hr>
    <p><em>Atención según prioridad asignada.</em></p>
</div>"#,
            citizen = escape_html(&notification.citizen_id),
            document = escape_html(&notification.document_type),
            color = tier_color(notification.priority),
            priority = notification.priority.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(priority: Priority) -> Notification {
        Notification { recipient: "a@b.com".into(),
                       priority,
                       document_type: "Emergencia Médica".into(),
                       citizen_id: "74700819".into() }
    }

    #[test]
    fn body_contains_fields_and_tier_color() {
        let html = render_html(&notification(Priority::High));
        assert!(html.contains("74700819"));
        assert!(html.contains("Emergencia Médica"));
        assert!(html.contains(">Alta</span>"));
        assert!(html.contains("#d32f2f"));
        assert!(render_html(&notification(Priority::Medium)).contains("#f57c00"));
        assert!(render_html(&notification(Priority::Low)).contains("#388e3c"));
    }

    #[test]
    fn body_escapes_user_values() {
        let mut n = notification(Priority::Low);
        n.citizen_id = "<script>alert(1)</script>".into();
        let html = render_html(&n);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn disabled_notifier_always_fails() {
        let n = DisabledNotifier;
        assert_eq!(n.send(&notification(Priority::High)), Err(NotificationFailure::Disabled));
        assert!(!n.is_enabled());
    }

    #[test]
    fn invalid_sender_is_rejected_at_construction() {
        let cfg = MailConfig { host: "localhost".into(),
                               port: 25,
                               username: None,
                               password: None,
                               from: "no es un correo".into(),
                               starttls: false,
                               timeout: Duration::from_secs(1) };
        assert!(matches!(SmtpNotifier::new(&cfg), Err(NotificationFailure::InvalidAddress(_))));
    }
}
