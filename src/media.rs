// src/media.rs
//! `data:` URIs for generated images

use base64::prelude::*;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DataUriError {
    #[error("Not a data URI")]
    MissingScheme,
    #[error("Data URI is not base64 encoded")]
    NotBase64,
    #[error("Data URI has an empty payload")]
    EmptyPayload,
    #[error("Invalid base64 payload: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    pub mime_type: String,
    pub payload: String,
}

impl DataUri {
    pub fn new(mime_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: payload.into(),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, BASE64_STANDARD.encode(bytes))
    }

    /// Parse `data:<mime>;base64,<payload>`
    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri.trim().strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingScheme)?;
        let mime_type = header.strip_suffix(";base64").ok_or(DataUriError::NotBase64)?;
        if payload.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }
        let mime_type = if mime_type.is_empty() {
            "application/octet-stream"
        } else {
            mime_type
        };
        Ok(Self::new(mime_type, payload))
    }

    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        BASE64_STANDARD
            .decode(self.payload.as_bytes())
            .map_err(|e| DataUriError::Decode(e.to_string()))
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.payload)
    }
}
