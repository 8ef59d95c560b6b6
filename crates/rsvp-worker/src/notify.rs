//! Mail queue writes. Delivery belongs to whatever drains the `mail` table.

use sea_orm::{ConnectionTrait, EntityTrait, Set};
use tracing::{debug, warn};

use entity::{mail, rsvp, RsvpStatus};

use crate::config::EventConfig;
use crate::error::RsvpError;
use crate::token::verification_link;
use crate::util::uuid_v4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

pub async fn enqueue<C: ConnectionTrait>(
    conn: &C,
    message: MailMessage,
    now: i64,
) -> Result<(), RsvpError> {
    let row = mail::ActiveModel {
        id: Set(uuid_v4()?),
        to_email: Set(message.to),
        subject: Set(message.subject),
        html: Set(message.html),
        created_at: Set(now),
    };

    mail::Entity::insert(row).exec(conn).await?;
    Ok(())
}

/// Creation hook for `rsvps`: queues the verification mail for a pending row.
///
/// Returns whether a message was queued.
pub async fn on_rsvp_created<C: ConnectionTrait>(
    conn: &C,
    config: &EventConfig,
    rsvp: &rsvp::Model,
    now: i64,
) -> Result<bool, RsvpError> {
    if rsvp.status != RsvpStatus::Pending {
        return Ok(false);
    }
    let Some(message) = verification_message(config, rsvp) else {
        return Ok(false);
    };

    enqueue(conn, message, now).await?;
    debug!("verification mail queued");
    Ok(true)
}

/// Queues the host summary for a freshly verified row. Skipped when no host address is set.
pub async fn enqueue_host_notification<C: ConnectionTrait>(
    conn: &C,
    config: &EventConfig,
    rsvp: &rsvp::Model,
    now: i64,
) -> Result<bool, RsvpError> {
    if config.host_email.is_empty() {
        warn!("HOST_EMAIL is not configured; skipping host notification");
        return Ok(false);
    }

    enqueue(conn, host_notification_message(config, rsvp), now).await?;
    Ok(true)
}

pub fn verification_message(config: &EventConfig, rsvp: &rsvp::Model) -> Option<MailMessage> {
    let token = rsvp.verification_token.as_deref()?;
    let link = verification_link(&config.app_base_url, token);
    let title = escape_html(&config.title);

    let html = format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Please confirm your RSVP</h2>
  <p>Hi {name},</p>
  <p>Thank you for RSVPing to <strong>{title}</strong>!</p>
  <p>Please click the button below to confirm your response:</p>
  <p style="text-align: center; margin: 32px 0;">
    <a href="{link}" style="background-color: #3b82f6; color: white; padding: 12px 32px; text-decoration: none; border-radius: 8px; font-weight: 600;">Confirm RSVP</a>
  </p>
  <p style="color: #6b7280; font-size: 14px;">This link will expire in 24 hours. If you did not submit this RSVP, you can safely ignore this email.</p>
  <hr style="border: none; border-top: 1px solid #e5e7eb; margin: 24px 0;" />
  <p style="color: #9ca3af; font-size: 12px;">{title} &middot; {date} &middot; {location}</p>
</div>"#,
        name = escape_html(&rsvp.name),
        link = escape_html(&link),
        date = escape_html(&config.date),
        location = escape_html(&config.location),
    );

    Some(MailMessage {
        to: rsvp.email.clone(),
        subject: format!("Confirm your RSVP for {}", config.title),
        html,
    })
}

pub fn host_notification_message(config: &EventConfig, rsvp: &rsvp::Model) -> MailMessage {
    let mut details = vec![
        format!("<strong>Name:</strong> {}", escape_html(&rsvp.name)),
        format!("<strong>Email:</strong> {}", escape_html(&rsvp.email)),
        format!(
            "<strong>Attending:</strong> {}",
            if rsvp.attending { "Yes" } else { "No" }
        ),
    ];

    if rsvp.attending {
        if let Some(count) = rsvp.guest_count {
            details.push(format!("<strong>Guests:</strong> {count}"));
        }
        if let Some(arrival) = rsvp.arrival_time.as_deref() {
            details.push(format!("<strong>Arrival Time:</strong> {}", escape_html(arrival)));
        }
    }

    if let Some(message) = rsvp.message.as_deref() {
        details.push(format!("<strong>Message:</strong> {}", escape_html(message)));
    }

    let rows: String = details
        .iter()
        .map(|d| format!(r#"<p style="margin: 4px 0;">{d}</p>"#))
        .collect();

    let html = format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>New RSVP Confirmed</h2>
  <p>A guest has confirmed their RSVP for <strong>{title}</strong>.</p>
  <div style="background-color: #f8f9fa; padding: 16px; border-radius: 8px; margin: 16px 0;">{rows}</div>
</div>"#,
        title = escape_html(&config.title),
    );

    MailMessage {
        to: config.host_email.clone(),
        subject: format!("New RSVP: {} for {}", rsvp.name, config.title),
        html,
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
