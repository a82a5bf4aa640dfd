//! JSON payload builders mirroring the backend's responses.

use serde_json::{Value, json};

/// A game row as the owned-games endpoint lists it (`cover_url`).
#[must_use]
pub fn owned_game(id: u64, appid: u64, name: &str) -> Value {
    json!({
        "id": id,
        "appid": appid,
        "name": name,
        "short_description": format!("{name} description"),
        "cover_url": format!("https://cdn.example/{appid}.jpg"),
    })
}

/// A game row as the favorites and recommendation endpoints list it (`header_image`).
#[must_use]
pub fn listed_game(appid: u64, name: &str) -> Value {
    json!({
        "appid": appid,
        "name": name,
        "short_description": format!("{name} description"),
        "header_image": format!("https://cdn.example/{appid}.jpg"),
    })
}

/// `count` consecutive rows built with `row`, starting at `first_appid`.
#[must_use]
pub fn rows(first_appid: u64, count: u64, row: fn(u64) -> Value) -> Vec<Value> {
    (first_appid..first_appid + count).map(row).collect()
}

/// Page-number pagination envelope.
#[must_use]
pub fn page(results: Vec<Value>, count: u64) -> Value {
    json!({
        "count": count,
        "next": null,
        "previous": null,
        "results": results,
    })
}

/// Session probe body.
#[must_use]
pub fn auth_check(authenticated: bool, username: Option<&str>) -> Value {
    json!({ "isAuthenticated": authenticated, "username": username })
}

/// Backend failure body.
#[must_use]
pub fn error_body(message: &str) -> Value {
    json!({ "error": message })
}
