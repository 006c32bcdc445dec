use std::time::Instant;

use axum::Json;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

pub static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": format!("Backend is running! Uptime: {}", format_uptime(START_TIME.elapsed().as_secs()))
    }))
}

fn format_uptime(seconds: u64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours % 24, minutes % 60, seconds % 60)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}
