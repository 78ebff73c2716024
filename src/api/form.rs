use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde_json::Value;

use crate::{
    error::{AppError, Result},
    storage::UploadedFile,
};

/// Admin form fields, read from multipart, urlencoded or JSON bodies alike.
///
/// Every field may repeat (`images`, `videos`); JSON arrays become repeated
/// values and scalars become their text form.
#[derive(Debug, Default)]
pub struct FormInput {
    fields: HashMap<String, Vec<String>>,
    files: Vec<(String, UploadedFile)>,
}

#[async_trait]
impl<S> FromRequest<S> for FormInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state).await?;
            Ok(Self::from_pairs(pairs))
        } else {
            let Json(value) = Json::<Value>::from_request(req, state).await?;
            Self::from_json(value)
        }
    }
}

impl FormInput {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut input = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await?;
                    // Browsers send an empty part for an untouched file input
                    if !file_name.is_empty() && !data.is_empty() {
                        input.files.push((
                            name,
                            UploadedFile {
                                file_name,
                                content_type,
                                data,
                            },
                        ));
                    }
                }
                None => {
                    let text = field.text().await?;
                    input.fields.entry(name).or_default().push(text);
                }
            }
        }

        Ok(input)
    }

    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut input = Self::default();
        for (name, value) in pairs {
            input.fields.entry(name).or_default().push(value);
        }
        input
    }

    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(AppError::BadRequest("Expected a JSON object".to_string()));
        };

        let mut input = Self::default();
        for (name, value) in map {
            let values = match value {
                Value::Null => continue,
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| scalar_text(&name, item))
                    .collect::<Result<Vec<_>>>()?,
                other => vec![scalar_text(&name, other)?],
            };
            input.fields.insert(name, values);
        }

        Ok(input)
    }

    /// First value of a field, untrimmed.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every non-blank value of a repeated field, trimmed.
    pub fn texts(&self, name: &str) -> Option<Vec<String>> {
        self.fields.get(name).map(|values| {
            values
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        })
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The trimmed values of `names`, or a 400 listing the ones that are missing or blank.
    pub fn require_all<const N: usize>(&self, names: [&str; N]) -> Result<[String; N]> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| self.text(name).map_or(true, |v| v.trim().is_empty()))
            .collect();

        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(names.map(|name| self.text(name).unwrap_or_default().trim().to_string()))
    }

    /// `None` when absent; a 400 when present but blank.
    pub fn non_blank(&self, name: &str) -> Result<Option<String>> {
        match self.text(name) {
            None => Ok(None),
            Some(value) if value.trim().is_empty() => {
                Err(AppError::BadRequest(format!("Field {} must not be empty", name)))
            }
            Some(value) => Ok(Some(value.trim().to_string())),
        }
    }

    /// Trimmed value, possibly empty.
    pub fn optional(&self, name: &str) -> Option<String> {
        self.text(name).map(|v| v.trim().to_string())
    }

    pub fn flag(&self, name: &str) -> Result<Option<bool>> {
        match self.text(name).map(|v| v.trim().to_ascii_lowercase()) {
            None => Ok(None),
            Some(v) => match v.as_str() {
                "true" | "on" | "1" | "yes" => Ok(Some(true)),
                "false" | "off" | "0" | "no" | "" => Ok(Some(false)),
                _ => Err(AppError::BadRequest(format!("Field {} must be a boolean", name))),
            },
        }
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        let index = self.files.iter().position(|(field, _)| field == name)?;
        Some(self.files.remove(index).1)
    }

    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(field, _)| field == name);
        self.files = rest;
        taken.into_iter().map(|(_, file)| file).collect()
    }
}

fn scalar_text(name: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(AppError::BadRequest(format!(
            "Field {} has an unsupported shape",
            name
        ))),
    }
}
