/**
 * Background Suggestion
 * Picks a curated hero background from mood keywords in the prompt
 */
use axum::Json;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extractors::{AdminSession, AppJson};

const QUALITY_BOOSTERS: &[&str] = &[
    "high resolution",
    "stunning aesthetic",
    "4k",
    "professional website background",
    "vibrant colors",
    "masterpiece",
    "clean composition",
    "minimalist style",
    "soft lighting",
    "cinematic",
    "dynamic range",
];

const CURATED_BACKGROUNDS: &[&str] = &[
    "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe",
    "https://images.unsplash.com/photo-1634017839464-5c339ebe3cb4",
    "https://images.unsplash.com/photo-1614850523296-d8c1af93d400",
    "https://images.unsplash.com/photo-1620641788421-7a1c342ea42e",
    "https://images.unsplash.com/photo-1579546929518-9e396f3cc809",
    "https://images.unsplash.com/photo-1557683316-973673baf926",
    "https://images.unsplash.com/photo-1477346611705-65d1883cee1e",
    "https://images.unsplash.com/photo-1519750783826-e2420f4d6871",
    "https://images.unsplash.com/photo-1550684848-fac1c5b4e853",
    "https://images.unsplash.com/photo-1506318137071-a8e063b4b519",
];

const BLUE: &str = "https://images.unsplash.com/photo-1519750783826-e2420f4d6871";
const WARM: &str = "https://images.unsplash.com/photo-1557683311-eac922327aa4";
const NATURE: &str = "https://images.unsplash.com/photo-1542273917363-3b1817f69a2d";
const DARK: &str = "https://images.unsplash.com/photo-1620641788421-7a1c342ea42e";

const IMAGE_PARAMS: &str = "q=90&w=2560&auto=format&fit=crop";

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub image_url: String,
    pub enhanced_prompt: String,
}

/// Keyword match first (blue, red/warm, green/nature, dark), random otherwise.
fn pick_background(prompt: &str) -> &'static str {
    let p = prompt.to_lowercase();
    if p.contains("blue") {
        BLUE
    } else if p.contains("red") || p.contains("warm") {
        WARM
    } else if p.contains("green") || p.contains("nature") {
        NATURE
    } else if p.contains("dark") {
        DARK
    } else {
        CURATED_BACKGROUNDS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(DARK)
    }
}

fn enhance_prompt(prompt: &str) -> String {
    let mut boosters = QUALITY_BOOSTERS.to_vec();
    boosters.shuffle(&mut rand::rng());
    format!(
        "{}, {}, smooth gradients, no noise",
        prompt,
        boosters[..3].join(", ")
    )
}

/// POST /api/admin/generate-bg
pub async fn generate_background(
    AdminSession(_): AdminSession,
    AppJson(payload): AppJson<GenerateRequest>,
) -> AppResult<Json<GenerateResponse>> {
    let prompt = payload.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::Validation("Prompt is required".to_string()));
    }

    let enhanced_prompt = enhance_prompt(prompt);
    let image_url = format!("{}?{}", pick_background(prompt), IMAGE_PARAMS);
    tracing::info!("Background suggested for prompt: {}", enhanced_prompt);

    Ok(Json(GenerateResponse {
        success: true,
        image_url,
        enhanced_prompt,
    }))
}
