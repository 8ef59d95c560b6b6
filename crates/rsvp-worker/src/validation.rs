//! Shape checks for the public submission form, applied before the submission transaction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::normalize_email;
use crate::submission::NewRsvp;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_MESSAGE_LEN: usize = 1000;
pub const MIN_GUESTS: i32 = 1;
pub const MAX_GUESTS: i32 = 10;

/// Raw form body as posted by the browser.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub attending: Option<bool>,
    pub guest_count: Option<i32>,
    pub arrival_time: Option<String>,
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("submission failed validation ({} field errors)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }
}

pub fn validate(form: RsvpForm) -> Result<NewRsvp, ValidationErrors> {
    let mut errors = Vec::new();
    let mut reject = |field, message| errors.push(FieldError { field, message });

    let name = form.name.trim().to_string();
    if name.is_empty() {
        reject("name", "Name is required");
    } else if name.chars().count() > MAX_NAME_LEN {
        reject("name", "Name must be at most 100 characters");
    }

    let email = normalize_email(&form.email);
    if email.is_empty() {
        reject("email", "Email is required");
    } else if !is_valid_email(&email) {
        reject("email", "Please enter a valid email address");
    }

    let attending = match form.attending {
        Some(a) => a,
        None => {
            reject("attending", "Please indicate if you will be attending");
            false
        }
    };

    let (guest_count, arrival_time) = if attending {
        let count = form.guest_count.unwrap_or(MIN_GUESTS);
        if !(MIN_GUESTS..=MAX_GUESTS).contains(&count) {
            reject("guestCount", "Number of guests must be between 1 and 10");
        }

        let arrival = form
            .arrival_time
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        match arrival.as_deref() {
            None => reject("arrivalTime", "Please select an arrival time"),
            Some(a) if !is_time_range(a) => {
                reject("arrivalTime", "Please select a valid arrival time")
            }
            Some(_) => {}
        }

        (Some(count), arrival)
    } else {
        (None, None)
    };

    let message = form
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    if message
        .as_ref()
        .is_some_and(|m| m.chars().count() > MAX_MESSAGE_LEN)
    {
        reject("message", "Message must be at most 1000 characters");
    }

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    Ok(NewRsvp {
        name,
        email,
        attending,
        guest_count,
        arrival_time,
        message,
    })
}

/// `local@domain.tld` with no whitespace, one `@`, and non-empty dot-separated domain labels.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

/// `HH:MM-HH:MM`, 24-hour clock.
fn is_time_range(raw: &str) -> bool {
    fn is_clock(t: &str) -> bool {
        let Some((h, m)) = t.split_once(':') else {
            return false;
        };
        if h.len() != 2 || m.len() != 2 {
            return false;
        }
        matches!((h.parse::<u8>(), m.parse::<u8>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
    }

    raw.split_once('-')
        .is_some_and(|(start, end)| is_clock(start) && is_clock(end))
}
