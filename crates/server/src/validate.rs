//! Contact form input validation.

use postbox_store::NewMessage;
use serde::Deserialize;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 255;
const SUBJECT_MIN: usize = 2;
const SUBJECT_MAX: usize = 200;
const MESSAGE_MIN: usize = 10;
const MESSAGE_MAX: usize = 5000;

/// Raw contact form body. Fields are optional so that missing and malformed
/// fields produce the same client-visible errors as present-but-invalid ones.
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// Validate a raw form, returning the cleaned submission or the
/// client-visible error string.
pub fn validate_form(form: &ContactForm) -> Result<NewMessage, &'static str> {
    let name = form.name.as_deref().unwrap_or("");
    let name_len = name.chars().count();
    if name_len < NAME_MIN || name_len > NAME_MAX {
        return Err("Invalid name");
    }

    let email = form.email.as_deref().unwrap_or("");
    if !is_valid_email(email) || email.chars().count() > EMAIL_MAX {
        return Err("Invalid email");
    }

    let subject = form.subject.as_deref().unwrap_or("");
    let subject_len = subject.chars().count();
    if subject_len < SUBJECT_MIN || subject_len > SUBJECT_MAX {
        return Err("Invalid subject");
    }

    let message = form.message.as_deref().unwrap_or("");
    let message_len = message.chars().count();
    if message_len < MESSAGE_MIN || message_len > MESSAGE_MAX {
        return Err("Message must be between 10 and 5000 characters");
    }

    Ok(NewMessage {
        name: name.to_string(),
        email: email.to_string(),
        subject: subject.to_string(),
        message: message.to_string(),
    })
}

/// Shape check only: one `@`, non-empty local part, dotted domain, no
/// whitespace. Deliverability is not this service's problem.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() => match domain.rsplit_once('.') {
            Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
            None => false,
        },
        _ => false,
    }
}
