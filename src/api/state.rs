//! Application state shared by handlers

use std::sync::Arc;

use crate::infrastructure::services::ModelKit;

#[derive(Debug, Clone)]
pub struct AppState {
    pub model_kit: Arc<ModelKit>,
}

impl AppState {
    pub fn new(model_kit: Arc<ModelKit>) -> Self {
        Self { model_kit }
    }
}
