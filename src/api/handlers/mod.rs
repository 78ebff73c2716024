pub mod activities;
pub mod admin;
pub mod announcements;
pub mod contact;
pub mod root;

use crate::error::{AppError, Result};

pub(crate) fn parse_id(raw: &str, kind: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} ID", kind)))
}
