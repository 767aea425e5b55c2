use serde::{Deserialize, Serialize};

const NAME_LABELS: [&str; 2] = ["nombre", "name"];
const PHONE_LABELS: [&str; 3] = ["teléfono", "telefono", "phone"];
const EMAIL_LABELS: [&str; 2] = ["email", "correo"];

/// Customer contact details as submitted with a booking. The calendar
/// event description is the only place these survive, so they are
/// written there as a labeled text block (`encode`) that the reminder
/// pipeline can recover later (`decode_contact`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactBlock {
    pub name: String,
    /// Digits only, no formatting characters
    pub phone: String,
    pub email: Option<String>,
}

impl ContactBlock {
    /// Renders the deterministic labeled block embedded in the event
    /// description.
    pub fn encode(&self) -> String {
        let mut block = format!("Nombre: {}\nTeléfono: {}", self.name, self.phone);
        if let Some(email) = &self.email {
            block.push_str(&format!("\nEmail: {}", email));
        }
        block
    }
}

/// Best effort decode result. A field the description does not carry
/// is simply absent, decoding never fails.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedContact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl DecodedContact {
    /// Reminders can only go out to events with a usable phone number.
    pub fn resolvable_phone(&self) -> Option<&str> {
        match &self.phone {
            Some(phone) if !phone.is_empty() => Some(phone),
            _ => None,
        }
    }
}

/// Scans a free-form event description for labeled contact lines.
///
/// Labels are matched case-insensitively and may sit anywhere in a
/// line, since the booking UI puts its own prose around the block.
/// The first match per field wins. Phone values are stripped down to
/// their digits.
pub fn decode_contact(description: &str) -> DecodedContact {
    let mut contact = DecodedContact::default();

    for line in description.lines() {
        if contact.name.is_none() {
            if let Some(value) = find_labeled_value(line, &NAME_LABELS) {
                if !value.is_empty() {
                    contact.name = Some(value.to_string());
                }
            }
        }
        if contact.phone.is_none() {
            if let Some(value) = find_labeled_value(line, &PHONE_LABELS) {
                let digits = value
                    .chars()
                    .filter(|c| c.is_ascii_digit())
                    .collect::<String>();
                if !digits.is_empty() {
                    contact.phone = Some(digits);
                }
            }
        }
        if contact.email.is_none() {
            if let Some(value) = find_labeled_value(line, &EMAIL_LABELS) {
                if !value.is_empty() {
                    contact.email = Some(value.to_string());
                }
            }
        }
    }

    contact
}

/// Finds the first `<label>:` occurrence in `line` for any of the
/// given lowercase labels and returns the trimmed text after the
/// colon. Matching walks characters instead of lowercasing the whole
/// line so that byte offsets into the original line stay valid.
fn find_labeled_value<'l>(line: &'l str, labels: &[&str]) -> Option<&'l str> {
    let chars = line.char_indices().collect::<Vec<_>>();

    for label in labels {
        let label_chars = label.chars().collect::<Vec<_>>();

        'position: for start in 0..chars.len() {
            let mut pos = start;
            for label_char in &label_chars {
                match chars.get(pos) {
                    Some((_, c)) if c.to_lowercase().eq(label_char.to_lowercase()) => pos += 1,
                    _ => continue 'position,
                }
            }
            if let Some((colon_idx, ':')) = chars.get(pos) {
                return Some(line[colon_idx + 1..].trim());
            }
        }
    }

    None
}
