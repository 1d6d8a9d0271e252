//! About-page timeline, stored as one JSON array under `about_timeline`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: String,
    pub year: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_th: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_th: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub order: i64,
}

fn default_color() -> String {
    "blue".to_string()
}

/// Parses a stored timeline for display. Invalid JSON or a non-array value
/// yields an empty list; items come back sorted by `order`.
pub fn parse(raw: &str) -> Vec<TimelineItem> {
    match decode(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "stored timeline is not a valid item array");
            Vec::new()
        }
    }
}

/// Strict decode used on writes.
pub fn decode(raw: &str) -> Result<Vec<TimelineItem>, serde_json::Error> {
    let mut items: Vec<TimelineItem> = serde_json::from_str(raw)?;
    items.sort_by_key(|i| i.order);
    Ok(items)
}

/// Rewrites `order` as 0..n following the current vector order.
pub fn resequence(items: &mut [TimelineItem]) {
    for (idx, item) in items.iter_mut().enumerate() {
        item.order = idx as i64;
    }
}

/// Validates and normalises a batch write: every item needs an id, a year and
/// a title; ids must be unique. Returns the JSON to store.
pub fn normalize(mut items: Vec<TimelineItem>) -> Result<String, String> {
    let mut seen = std::collections::HashSet::new();
    for item in &items {
        if item.id.trim().is_empty() || item.year.trim().is_empty() || item.title.trim().is_empty()
        {
            return Err("Timeline items need an id, a year and a title".to_string());
        }
        if !seen.insert(item.id.clone()) {
            return Err(format!("Duplicate timeline item id '{}'", item.id));
        }
    }
    resequence(&mut items);
    serde_json::to_string(&items).map_err(|e| e.to_string())
}

/// Shown until an operator saves a timeline.
pub fn default_items() -> Vec<TimelineItem> {
    let item = |id: &str, year: &str, title: &str, description: &str, color: &str, order| {
        TimelineItem {
            id: id.to_string(),
            year: year.to_string(),
            title: title.to_string(),
            title_th: None,
            description: description.to_string(),
            description_th: None,
            color: color.to_string(),
            order,
        }
    };
    vec![
        item(
            "1",
            "2018 - 2022",
            "Stellar Academy",
            "Bachelor of Cosmic Science & Digital Engineering. Graduated with honors in algorithmic navigation.",
            "blue",
            0,
        ),
        item(
            "2",
            "2022 - 2024",
            "Nebula Systems",
            "Lead Interface Architect. Developed zero-gravity UI components for interplanetary data streams.",
            "pink",
            1,
        ),
        item(
            "3",
            "Present Day",
            "Independent Exploration",
            "Deploying custom-built digital ecosystems. Specializing in high-performance Web-Apps and Cyber-Aesthetics.",
            "purple",
            2,
        ),
    ]
}
