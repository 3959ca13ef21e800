// src/engine/request.rs
// Inbound request schemas and their boundary validation

use serde::Deserialize;

use crate::error::{Result, VizzyError};

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
    #[serde(default)]
    pub num_images: i64,
}

impl GenerationRequest {
    pub fn new(session_id: Option<&str>, message: impl Into<String>, num_images: i64) -> Self {
        Self {
            session_id: session_id.map(str::to_string),
            message: message.into(),
            num_images,
        }
    }

    /// Returns the trimmed prompt and the image count
    pub fn validate(&self, max_images: u32) -> Result<(String, usize)> {
        let message = require_text("message", &self.message)?;
        let count = validate_count(self.num_images, max_images)?;
        Ok((message, count))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefineRequest {
    pub session_id: String,
    pub message: String,
    #[serde(default)]
    pub refinement: Option<String>,
    #[serde(default)]
    pub num_images: i64,
}

/// A refine request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRefinement {
    pub session_id: String,
    pub original: String,
    pub refinement: String,
    pub count: usize,
}

impl RefineRequest {
    pub fn validate(&self, max_images: u32) -> Result<ValidRefinement> {
        Ok(ValidRefinement {
            session_id: require_text("session_id", &self.session_id)?,
            original: require_text("message", &self.message)?,
            refinement: require_text("refinement", self.refinement.as_deref().unwrap_or(""))?,
            count: validate_count(self.num_images, max_images)?,
        })
    }
}

fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VizzyError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn validate_count(num_images: i64, max_images: u32) -> Result<usize> {
    if num_images < 0 {
        return Err(VizzyError::Validation(format!(
            "num_images must not be negative, got {}",
            num_images
        )));
    }
    if num_images > i64::from(max_images) {
        return Err(VizzyError::Validation(format!(
            "num_images must be at most {}, got {}",
            max_images, num_images
        )));
    }
    Ok(num_images as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let req = GenerationRequest::new(None, "  A dark shadowy forest ", 3);
        let (message, count) = req.validate(8).unwrap();
        assert_eq!(message, "A dark shadowy forest");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_empty_message_rejected() {
        let req = GenerationRequest::new(None, " \n\t ", 0);
        assert!(matches!(req.validate(8), Err(VizzyError::Validation(_))));
    }

    #[test]
    fn test_image_count_bounds() {
        assert!(GenerationRequest::new(None, "x", -1).validate(8).is_err());
        assert!(GenerationRequest::new(None, "x", 9).validate(8).is_err());
        assert_eq!(GenerationRequest::new(None, "x", 8).validate(8).unwrap().1, 8);
        assert_eq!(GenerationRequest::new(None, "x", 0).validate(8).unwrap().1, 0);
    }

    #[test]
    fn test_num_images_defaults_to_zero() {
        let req: GenerationRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(req.num_images, 0);
        assert!(req.session_id.is_none());
    }

    #[test]
    fn test_refine_requires_all_text() {
        let req: RefineRequest = serde_json::from_str(
            r#"{"session_id":"s1","message":"Create a abstract painting","refinement":" with more blue tones ","num_images":2}"#,
        )
        .unwrap();
        let valid = req.validate(8).unwrap();
        assert_eq!(valid.refinement, "with more blue tones");
        assert_eq!(valid.count, 2);

        let missing: RefineRequest =
            serde_json::from_str(r#"{"session_id":"s1","message":"m"}"#).unwrap();
        assert!(missing.validate(8).is_err());

        let blank_session: RefineRequest =
            serde_json::from_str(r#"{"session_id":"  ","message":"m","refinement":"r"}"#).unwrap();
        assert!(blank_session.validate(8).is_err());
    }
}
