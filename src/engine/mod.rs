// src/engine/mod.rs
// Orchestration engine: one turn from validated request to assembled response

mod refine;
mod request;
mod response;
mod router;

pub use refine::merge_prompt;
pub use request::{GenerationRequest, RefineRequest, ValidRefinement};
pub use response::{ChatResponse, ModelSelection, SessionView};
pub use router::{Mode, ModeRouter, Route};

use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::VizzyConfig;
use crate::error::Result;
use crate::image::ImageGateway;
use crate::llm::LlmClient;
use crate::session::{Message, SessionHandle, SessionStore};

/// Limits applied to every turn
#[derive(Debug, Clone, Copy)]
pub struct EngineLimits {
    pub max_images: u32,
    pub history_limit: usize,
}

impl From<&VizzyConfig> for EngineLimits {
    fn from(config: &VizzyConfig) -> Self {
        Self {
            max_images: config.max_images,
            history_limit: config.history_limit,
        }
    }
}

pub struct Engine {
    sessions: SessionStore,
    llm: Arc<dyn LlmClient>,
    images: ImageGateway,
    router: ModeRouter,
    limits: EngineLimits,
}

impl Engine {
    pub fn new(llm: Arc<dyn LlmClient>, images: ImageGateway, limits: EngineLimits) -> Self {
        let router = ModeRouter::new(llm.model_name());
        Self {
            sessions: SessionStore::new(),
            llm,
            images,
            router,
            limits,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// A chat turn. Never fails on the session: unknown ids are adopted.
    /// A freshly minted session is only kept once its first turn succeeds.
    #[instrument(skip(self, request), fields(session_id = request.session_id.as_deref().unwrap_or("-")))]
    pub async fn chat(&self, request: GenerationRequest) -> Result<ChatResponse> {
        let (prompt, count) = request.validate(self.limits.max_images)?;
        let session = self.sessions.open(request.session_id.as_deref()).await;
        let response = self.run_turn(&session, &prompt, &prompt, count).await?;
        self.sessions.persist(&session).await;
        Ok(response)
    }

    /// Re-run generation on an existing session with a refined prompt
    #[instrument(skip(self, request), fields(session_id = %request.session_id))]
    pub async fn refine(&self, request: RefineRequest) -> Result<ChatResponse> {
        let valid = request.validate(self.limits.max_images)?;
        let session = self.sessions.get_or_create(Some(&valid.session_id)).await?;
        let prompt = merge_prompt(&valid.original, &valid.refinement);
        self.run_turn(&session, &prompt, &valid.refinement, valid.count)
            .await
    }

    pub async fn session(&self, session_id: &str) -> Result<SessionView> {
        self.sessions.lookup(session_id).await.map(SessionView::from)
    }

    /// Shared pipeline: route, call both gateways together, then record the turn.
    /// Nothing is appended unless the model call succeeds and the future runs to the end.
    async fn run_turn(
        &self,
        session: &SessionHandle,
        prompt: &str,
        recorded: &str,
        count: usize,
    ) -> Result<ChatResponse> {
        let route = self.router.route(count);
        let turn = session.begin_turn().await;
        let history = turn.history(self.limits.history_limit).await;

        let (interpretation, batch) = tokio::join!(
            self.llm.interpret(prompt, &history, route.mode),
            self.images.generate(prompt, route.mode.image_count()),
        );
        let interpretation = interpretation?;

        turn.commit(
            Message::user(recorded),
            Message::assistant(interpretation.copy.as_str()),
        )
        .await;

        info!(
            session_id = session.id(),
            mode = ?route.mode,
            intent = %interpretation.intent_category,
            image_model = %batch.model,
            "Turn complete"
        );
        Ok(ChatResponse::assemble(
            session.id(),
            interpretation,
            batch,
            &route.llm_model,
        ))
    }
}
