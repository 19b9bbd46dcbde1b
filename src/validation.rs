// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! Input validation for registration and card payloads.
//!
//! Checks run in declaration order and stop at the first violation, so the
//! 400 response always names a single offending field. Bounds are character
//! counts, not byte lengths.

use unicode_normalization::UnicodeNormalization;
use url::Url;

use crate::error::ApiError;
use crate::models::{Address, CardPayload, ImageRef, RegisterRequest};

/// Normalize an email into the stored login key: trim, NFKC, lowercase.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().nfkc().collect::<String>().to_lowercase()
}

/// Validate a registration payload. Returns the first violated field's
/// message as a 400.
pub fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    check_length("firstName", &req.first_name, 2, 50)?;
    check_length("lastName", &req.last_name, 2, 50)?;
    check_length("phone", &req.phone, 9, 15)?;

    if !is_valid_email(&normalize_email(&req.email)) {
        return Err(ApiError::bad_request("email must be a valid email address"));
    }

    if req.password.chars().count() < 6 {
        return Err(ApiError::bad_request(
            "password must be at least 6 characters long",
        ));
    }

    validate_image(&req.image)?;
    validate_address(&req.address)
}

/// Validate a card create/update payload.
pub fn validate_card_payload(payload: &CardPayload) -> Result<(), ApiError> {
    check_length("title", &payload.title, 2, 100)?;

    if payload.subtitle.chars().count() > 200 {
        return Err(ApiError::bad_request(
            "subtitle must be at most 200 characters long",
        ));
    }

    check_length("description", &payload.description, 10, 1000)?;
    check_length("phone", &payload.phone, 9, 15)?;

    validate_image(&payload.image)?;
    validate_address(&payload.address)
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(ApiError::bad_request(format!(
            "{field} must be between {min} and {max} characters long"
        )));
    }
    Ok(())
}

fn validate_image(image: &ImageRef) -> Result<(), ApiError> {
    if !image.url.is_empty() && Url::parse(&image.url).is_err() {
        return Err(ApiError::bad_request("image.url must be a valid URI"));
    }
    Ok(())
}

fn validate_address(address: &Address) -> Result<(), ApiError> {
    for (field, value) in [
        ("address.country", &address.country),
        ("address.city", &address.city),
        ("address.street", &address.street),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::bad_request(format!("{field} is required")));
        }
    }

    if address.house_number < 1 {
        return Err(ApiError::bad_request("address.houseNumber is required"));
    }

    Ok(())
}

/// Structural email check: non-empty local part, dotted domain, no
/// whitespace. Deliberately loose; the email is a login key, not a
/// deliverability guarantee.
fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };

    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.len() >= 3
}
