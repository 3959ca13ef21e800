// src/engine/response.rs
// Outbound response contracts

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::image::{ImageArtifact, ImageBatch};
use crate::llm::Interpretation;
use crate::session::{Message, Session, TasteProfile};

/// Which models served a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub llm_model: String,
    pub image_model: String,
}

/// Response to `/chat` and `/refine`. Every field is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub message: String,
    pub copy: String,
    pub images: Vec<ImageArtifact>,
    pub intent_category: String,
    pub llm_model: String,
    pub image_model: String,
}

impl ChatResponse {
    pub fn assemble(session_id: &str, interpretation: Interpretation, batch: ImageBatch, llm_model: &str) -> Self {
        Self::from_parts(
            session_id,
            interpretation,
            batch.images,
            ModelSelection {
                llm_model: llm_model.to_string(),
                image_model: batch.model,
            },
        )
    }

    pub fn from_parts(
        session_id: &str,
        interpretation: Interpretation,
        images: Vec<ImageArtifact>,
        models: ModelSelection,
    ) -> Self {
        Self {
            session_id: session_id.to_string(),
            message: interpretation.copy.clone(),
            copy: interpretation.copy,
            images,
            intent_category: interpretation.intent_category,
            llm_model: models.llm_model,
            image_model: models.image_model,
        }
    }
}

/// Read-only view of a session for `/session/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
    pub taste: TasteProfile,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.id,
            created_at: session.created_at,
            messages: session.messages,
            taste: session.taste,
        }
    }
}
