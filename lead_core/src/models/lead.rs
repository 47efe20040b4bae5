//! Lead submission data model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The type of renovation work the customer is enquiring about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Bathroom,
    Extension,
    Other,
}

impl Service {
    /// Label used in the notification email.
    pub fn label(&self) -> &'static str {
        match self {
            Service::Bathroom => "Bathroom renovation",
            Service::Extension => "House extension",
            Service::Other => "Other project",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Service {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bathroom" => Ok(Service::Bathroom),
            "extension" => Ok(Service::Extension),
            "other" => Ok(Service::Other),
            _ => Err(()),
        }
    }
}

/// A photo the customer attached to their enquiry.
#[derive(Debug, Clone)]
pub struct PhotoAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl PhotoAttachment {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// The data a prospective customer submits across the four form steps.
///
/// `service` is optional at the model level so the first step can report a
/// missing selection; a lead only reaches dispatch with `Some(service)`.
#[derive(Debug, Clone, Default)]
pub struct LeadSubmission {
    pub service: Option<Service>,
    pub postcode: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub photos: Vec<PhotoAttachment>,
}

/// Result returned to the caller for every submission attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}
