//! Photo attachment validation

use std::collections::HashSet;
use thiserror::Error;

use crate::models::PhotoAttachment;
use crate::validation::ErrorCode;

pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PhotoError {
    #[error("Photo too large: {size} bytes (max: {max_size} bytes)")]
    TooLarge { size: u64, max_size: u64 },

    #[error("Unsupported photo type: {content_type} (allowed: JPEG, PNG, WebP)")]
    InvalidType { content_type: String },

    #[error("Empty photo not allowed")]
    Empty,
}

impl PhotoError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PhotoError::TooLarge { .. } => ErrorCode::TooLarge,
            PhotoError::InvalidType { .. } | PhotoError::Empty => ErrorCode::InvalidType,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PhotoPolicy {
    pub max_bytes: u64,
    pub allowed_content_types: HashSet<String>,
    pub check_magic_bytes: bool,
}

impl Default for PhotoPolicy {
    fn default() -> Self {
        let mut allowed = HashSet::new();
        allowed.insert(mime::IMAGE_JPEG.to_string());
        allowed.insert(mime::IMAGE_PNG.to_string());
        allowed.insert("image/webp".to_string());

        Self {
            max_bytes: MAX_PHOTO_BYTES,
            allowed_content_types: allowed,
            check_magic_bytes: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PhotoValidator {
    policy: PhotoPolicy,
}

impl PhotoValidator {
    pub fn new(policy: PhotoPolicy) -> Self {
        Self { policy }
    }

    pub fn validate(&self, photo: &PhotoAttachment) -> Result<(), PhotoError> {
        if photo.data.is_empty() {
            return Err(PhotoError::Empty);
        }

        if photo.size() > self.policy.max_bytes {
            return Err(PhotoError::TooLarge {
                size: photo.size(),
                max_size: self.policy.max_bytes,
            });
        }

        let content_type = normalize_content_type(&photo.content_type);
        if !self.policy.allowed_content_types.contains(&content_type) {
            return Err(PhotoError::InvalidType {
                content_type: photo.content_type.clone(),
            });
        }

        if self.policy.check_magic_bytes && !magic_bytes_match(&content_type, &photo.data) {
            return Err(PhotoError::InvalidType {
                content_type: photo.content_type.clone(),
            });
        }

        Ok(())
    }
}

/// Strip parameters (e.g. `image/jpeg; charset=...`) and lowercase.
fn normalize_content_type(content_type: &str) -> String {
    content_type
        .parse::<mime::Mime>()
        .map(|m| m.essence_str().to_ascii_lowercase())
        .unwrap_or_else(|_| content_type.trim().to_ascii_lowercase())
}

fn magic_bytes_match(content_type: &str, data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }
    match content_type {
        "image/jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        "image/png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47]),
        "image/webp" => data.starts_with(b"RIFF") && &data[8..12] == b"WEBP",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(content_type: &str, data: Vec<u8>) -> PhotoAttachment {
        PhotoAttachment {
            filename: "photo.bin".to_string(),
            content_type: content_type.to_string(),
            data,
        }
    }

    fn jpeg_bytes(total: usize) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
        data.resize(total, 0);
        data
    }

    fn png_bytes(total: usize) -> Vec<u8> {
        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.resize(total, 0);
        data
    }

    #[test]
    fn test_oversized_jpeg_rejected() {
        let validator = PhotoValidator::default();
        let six_mb = 6 * 1024 * 1024;
        let err = validator
            .validate(&photo("image/jpeg", jpeg_bytes(six_mb)))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::TooLarge);
    }

    #[test]
    fn test_bmp_rejected() {
        let validator = PhotoValidator::default();
        let mut data = b"BM".to_vec();
        data.resize(4 * 1024 * 1024, 0);
        let err = validator
            .validate(&photo("image/bmp", data))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidType);
    }

    #[test]
    fn test_png_within_limit_accepted() {
        let validator = PhotoValidator::default();
        let four_mb = 4 * 1024 * 1024;
        assert!(validator.validate(&photo("image/png", png_bytes(four_mb))).is_ok());
    }

    #[test]
    fn test_webp_accepted() {
        let validator = PhotoValidator::default();
        let mut data = b"RIFF\x00\x00\x00\x00WEBP".to_vec();
        data.resize(1024, 0);
        assert!(validator.validate(&photo("image/webp", data)).is_ok());
    }

    #[test]
    fn test_content_type_parameters_ignored() {
        let validator = PhotoValidator::default();
        assert!(validator
            .validate(&photo("image/jpeg; charset=utf-8", jpeg_bytes(1024)))
            .is_ok());
    }

    #[test]
    fn test_mismatched_magic_bytes_rejected() {
        let validator = PhotoValidator::default();
        // Declared JPEG but carries a PNG header
        let err = validator
            .validate(&photo("image/jpeg", png_bytes(1024)))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidType);
    }

    #[test]
    fn test_empty_photo_rejected() {
        let validator = PhotoValidator::default();
        let err = validator.validate(&photo("image/jpeg", vec![])).unwrap_err();
        assert_eq!(err, PhotoError::Empty);
    }
}
