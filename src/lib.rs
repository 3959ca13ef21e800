// src/lib.rs
// Vizzy Chat - conversational image generation engine

pub mod config;
pub mod engine;
pub mod error;
pub mod http_client;
pub mod image;
pub mod llm;
pub mod session;
pub mod web;

pub use error::{Result, VizzyError};
