use askama_axum::Template;
use axum::{extract::State, response::IntoResponse, Form};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::classifier::{trim_text, ClassifierResolver, Label};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    email: String,
    prediction: Option<Label>,
}

#[derive(Deserialize)]
pub struct ClassifyForm {
    #[serde(default)]
    email: String,
}

pub struct AppState {
    pub resolver: ClassifierResolver,
}

// Empty form (GET)
pub async fn index_page() -> impl IntoResponse {
    IndexTemplate {
        email: String::new(),
        prediction: None,
    }
}

// Form submission (POST)
pub async fn index_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ClassifyForm>,
) -> impl IntoResponse {
    let email = trim_text(&form.email).to_string();

    // Blank input is not classified
    let prediction = if email.is_empty() {
        None
    } else {
        let prediction = state.resolver.classify(&email);
        info!(
            "Classified {} chars as {} via {:?}",
            email.chars().count(),
            prediction.label,
            prediction.source
        );
        Some(prediction.label)
    };

    IndexTemplate { email, prediction }
}
