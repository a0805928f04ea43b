//! Validation Utilities

use bson::oid::ObjectId;
use validator::{ValidationError, ValidationErrors};

use super::error::AppError;

/// Maximum accepted size of an avatar reference, in bytes.
pub const MAX_AVATAR_URI_BYTES: usize = 2047;

/// Maximum accepted size of an inline message image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// Convert validation errors to AppError, keeping one detail line per failing rule.
pub fn validation_error(message: &str, errors: ValidationErrors) -> AppError {
    let mut details: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let reason = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed on the '{}' rule", e.code));
                format!("Field {}: {}", field, reason)
            })
        })
        .collect();
    details.sort();

    AppError::Validation {
        message: message.to_string(),
        details,
    }
}

fn is_media_uri(value: &str) -> bool {
    let accepted = value.starts_with("data:")
        || value.starts_with("http://")
        || value.starts_with("https://");
    accepted && !value.chars().any(char::is_whitespace)
}

/// Avatar references are either remote URLs or inline data URIs.
pub fn validate_avatar_uri(value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_AVATAR_URI_BYTES {
        return Err(ValidationError::new("avatar_too_long")
            .with_message("avatarUri is too long".into()));
    }

    if is_media_uri(value) {
        Ok(())
    } else {
        Err(ValidationError::new("avatar_uri")
            .with_message("avatarUri must be a URL or a data URI".into()))
    }
}

/// Message images follow the avatar format with a larger size bound.
pub fn validate_image_uri(value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_IMAGE_BYTES {
        return Err(ValidationError::new("image_too_large").with_message("image is too large".into()));
    }

    if is_media_uri(value) {
        Ok(())
    } else {
        Err(ValidationError::new("image_uri").with_message("image must be a URL or a data URI".into()))
    }
}

/// Parse a path identifier, rejecting anything that is not a 24-char hex ObjectId.
pub fn parse_object_id(field: &str, raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::Validation {
        message: format!("invalid {}", field),
        details: vec![format!("Field {}: must be a 24 character hex identifier", field)],
    })
}
