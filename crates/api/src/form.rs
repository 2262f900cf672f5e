//! Multipart form decoding.
//!
//! Every create and edit endpoint accepts `multipart/form-data` with the
//! Spanish field names of the web forms (`nombre`, `pais`, `numero`...). Parts that
//! carry a file name are kept as raw bytes, everything else as text.
//! Handlers then pull typed values out of [`FormData`] and build their DTOs.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use chrono::NaiveDate;
use paddock_core::error::CoreError;
use paddock_core::validation::{clean_optional_text, clean_text};

use crate::error::{AppError, AppResult};

/// Date format of `fecha` / `fecha_nacimiento` fields (HTML date inputs).
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Collected text fields and file parts of one multipart request.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, Vec<u8>>,
}

impl FormData {
    /// Drain a multipart body. Later parts with the same name win.
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if field.file_name().is_some() {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.files.insert(name, bytes.to_vec());
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    /// Trimmed value of a field that must be sent. A blank value is returned
    /// as-is so the DTO validation can reject it with its own constraint.
    pub fn required_text(&self, name: &str) -> AppResult<String> {
        self.text(name)
            .ok_or_else(|| CoreError::invalid(name, "is required").into())
    }

    /// Trimmed value of a field if it was sent at all, blank included.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(|v| clean_text(v))
    }

    /// Trimmed value of an optional field; blank counts as absent.
    pub fn optional_text(&self, name: &str) -> Option<String> {
        clean_optional_text(self.fields.get(name).map(String::as_str))
    }

    /// Parse an optional numeric field; blank counts as absent.
    pub fn number<T: FromStr>(&self, name: &str) -> AppResult<Option<T>> {
        self.optional_text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| AppError::BadRequest(format!("'{name}' must be a number, got '{raw}'")))
            })
            .transpose()
    }

    /// Parse a numeric field that must be sent.
    pub fn required_number<T: FromStr>(&self, name: &str) -> AppResult<T> {
        self.number(name)?
            .ok_or_else(|| CoreError::invalid(name, "is required").into())
    }

    /// Parse an optional `YYYY-MM-DD` date; blank counts as absent.
    pub fn date(&self, name: &str) -> AppResult<Option<NaiveDate>> {
        self.optional_text(name)
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| {
                    AppError::BadRequest(format!("'{name}' must be a YYYY-MM-DD date, got '{raw}'"))
                })
            })
            .transpose()
    }

    /// Remove and return the bytes of a file part.
    pub fn take_file(&mut self, name: &str) -> Option<Vec<u8>> {
        self.files.remove(name)
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_file(mut self, name: &str, bytes: &[u8]) -> Self {
        self.files.insert(name.to_string(), bytes.to_vec());
        self
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
