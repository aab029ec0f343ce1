use std::sync::LazyLock;

use regex::Regex;

use portfolio_types::api::{NewContact, NewScore};

use crate::error::ApiError;

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_EMAIL_CHARS: usize = 254;
pub const MAX_MESSAGE_CHARS: usize = 1000;
pub const MAX_PLAYER_NAME_CHARS: usize = 20;

// local@domain.tld, no whitespace, no empty domain labels
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid email regex"));

/// Checks a contact submission and returns it with surrounding whitespace removed.
pub fn contact(input: NewContact) -> Result<NewContact, ApiError> {
    let name = input.name.trim().to_string();
    let email = input.email.trim().to_string();
    let message = input.message.trim().to_string();

    bounded_text("name", &name, MAX_NAME_CHARS)?;
    bounded_text("message", &message, MAX_MESSAGE_CHARS)?;
    if email.chars().count() > MAX_EMAIL_CHARS || !EMAIL_RE.is_match(&email) {
        return Err(ApiError::Validation(format!("'{}' is not a valid email address", email)));
    }

    Ok(NewContact {
        name,
        email,
        message,
    })
}

pub fn score(input: NewScore) -> Result<NewScore, ApiError> {
    let player_name = input.player_name.trim().to_string();
    bounded_text("playerName", &player_name, MAX_PLAYER_NAME_CHARS)?;

    at_least("score", input.score, 0)?;
    at_least("level", input.level, 1)?;
    at_least("lines", input.lines, 0)?;
    at_least("durationSeconds", input.duration_seconds, 0)?;

    Ok(NewScore {
        player_name,
        ..input
    })
}

fn bounded_text(field: &str, value: &str, max_chars: usize) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{} must not be empty", field)));
    }
    if value.chars().count() > max_chars {
        return Err(ApiError::Validation(format!(
            "{} must be at most {} characters",
            field, max_chars
        )));
    }
    Ok(())
}

fn at_least(field: &str, value: i64, min: i64) -> Result<(), ApiError> {
    if value < min {
        return Err(ApiError::Validation(format!("{} must be at least {}", field, min)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_contact(name: &str, email: &str, message: &str) -> NewContact {
        NewContact {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    fn new_score(player_name: &str, score: i64, level: i64) -> NewScore {
        NewScore {
            player_name: player_name.to_string(),
            score,
            level,
            lines: 0,
            duration_seconds: 30,
        }
    }

    #[test]
    fn accepts_and_trims_a_good_contact() {
        let ok = contact(new_contact("  Ada ", "ada@example.com ", "hi")).unwrap();
        assert_eq!(ok.name, "Ada");
        assert_eq!(ok.email, "ada@example.com");
    }

    #[test]
    fn rejects_bad_emails() {
        for email in ["not-an-email", "a@b", "a b@example.com", "@example.com", "a@.com", "a@@b.com"] {
            let result = contact(new_contact("Ada", email, "hi"));
            assert!(matches!(result, Err(ApiError::Validation(_))), "{} accepted", email);
        }
    }

    #[test]
    fn enforces_contact_lengths() {
        assert!(contact(new_contact("", "a@b.co", "hi")).is_err());
        assert!(contact(new_contact("   ", "a@b.co", "hi")).is_err());
        assert!(contact(new_contact(&"n".repeat(51), "a@b.co", "hi")).is_err());
        assert!(contact(new_contact(&"n".repeat(50), "a@b.co", "hi")).is_ok());
        assert!(contact(new_contact("Ada", "a@b.co", "")).is_err());
        assert!(contact(new_contact("Ada", "a@b.co", &"m".repeat(1001))).is_err());
        assert!(contact(new_contact("Ada", "a@b.co", &"m".repeat(1000))).is_ok());
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        assert!(contact(new_contact(&"é".repeat(50), "a@b.co", "hi")).is_ok());
        assert!(score(new_score(&"ü".repeat(20), 1, 1)).is_ok());
    }

    #[test]
    fn enforces_score_bounds() {
        assert!(score(new_score("p", 0, 1)).is_ok());
        assert!(score(new_score("p", -1, 1)).is_err());
        assert!(score(new_score("p", 10, 0)).is_err());
        assert!(score(new_score("", 10, 1)).is_err());
        assert!(score(new_score(&"p".repeat(21), 10, 1)).is_err());

        let mut negative_lines = new_score("p", 10, 1);
        negative_lines.lines = -1;
        assert!(score(negative_lines).is_err());

        let mut negative_duration = new_score("p", 10, 1);
        negative_duration.duration_seconds = -5;
        assert!(score(negative_duration).is_err());
    }
}
