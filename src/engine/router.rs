// src/engine/router.rs
// Per-request mode selection

/// What a turn produces besides copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Chat,
    Image { count: usize },
}

impl Mode {
    pub fn image_count(&self) -> usize {
        match self {
            Mode::Chat => 0,
            Mode::Image { count } => *count,
        }
    }
}

/// The routing decision for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub mode: Mode,
    pub llm_model: String,
}

/// Chooses chat or image mode from the requested image count. Stateless: the mode
/// of one turn never carries over to the next.
#[derive(Debug, Clone)]
pub struct ModeRouter {
    llm_model: String,
}

impl ModeRouter {
    pub fn new(llm_model: impl Into<String>) -> Self {
        Self {
            llm_model: llm_model.into(),
        }
    }

    pub fn route(&self, num_images: usize) -> Route {
        let mode = match num_images {
            0 => Mode::Chat,
            count => Mode::Image { count },
        };
        Route {
            mode,
            llm_model: self.llm_model.clone(),
        }
    }
}
