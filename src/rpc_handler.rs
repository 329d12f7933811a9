//! RPC method handler for the Eternal History JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested. `handle_method`
//! dispatches a method name and its params to the history store, saved
//! queries and settings held by [`App`].

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::app::App;
use crate::managers::saved_query_manager::SavedQueryManagerTrait;
use crate::services::highlight::highlight;
use crate::services::query_engine::parse_query;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::errors::HistoryError;
use crate::types::history::HistoryRecord;

/// Incoming history record; only `url` is required.
#[derive(Debug, Deserialize)]
struct RecordParams {
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default = "default_visit_count")]
    visit_count: u32,
    #[serde(default)]
    last_visit_time: Option<i64>,
}

fn default_visit_count() -> u32 {
    1
}

impl RecordParams {
    fn into_record(self, now_ms: i64) -> Result<HistoryRecord, String> {
        if self.url.trim().is_empty() {
            return Err("missing url".to_string());
        }
        Ok(HistoryRecord::new(
            &self.url,
            &self.title,
            self.last_visit_time.unwrap_or(now_ms),
            self.visit_count,
        ))
    }
}

fn parse<T: for<'de> Deserialize<'de>>(value: Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| format!("invalid params: {}", e))
}

fn record_json(record: &HistoryRecord) -> Value {
    json!({
        "id": record.id,
        "url": record.url,
        "title": record.title,
        "domain": record.domain,
        "visit_count": record.visit_count,
        "last_visit_time": record.last_visit_time,
    })
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── History ───
        "history.record" => {
            let a = app.lock().await;
            if !a.recording_enabled() {
                return Err(HistoryError::RecordingDisabled.to_string());
            }
            let now = chrono::Utc::now().timestamp_millis();
            let record = parse::<RecordParams>(params.clone())?.into_record(now)?;
            match a.history.insert(&record).await {
                Ok(outcome) => Ok(json!({"id": outcome.id(), "ok": true})),
                Err(e) => {
                    // The visit is dropped; there is no retry queue.
                    warn!(url = %record.url, error = %e, "dropping history event");
                    Err(e.to_string())
                }
            }
        }
        "history.import" => {
            let raw = params.get("records").cloned().ok_or("missing records")?;
            let items: Vec<RecordParams> = parse(raw)?;
            let now = chrono::Utc::now().timestamp_millis();
            let records = items
                .into_iter()
                .map(|p| p.into_record(now))
                .collect::<Result<Vec<_>, _>>()?;

            let a = app.lock().await;
            if !a.recording_enabled() {
                return Err(HistoryError::RecordingDisabled.to_string());
            }
            let count = a.history.insert_many(&records).await.map_err(|e| e.to_string())?;
            Ok(json!({"imported": count}))
        }
        "history.search" => {
            let query = params.get("query").and_then(|v| v.as_str()).ok_or("missing query")?;
            let parsed = parse_query(query);
            let a = app.lock().await;
            let records = a.history.search(query).await;
            let items: Vec<Value> = records
                .iter()
                .map(|r| {
                    let mut item = record_json(r);
                    item["highlights"] = json!(highlight(&r.title, &parsed));
                    item
                })
                .collect();
            Ok(json!({"items": items, "terms": parsed.text_terms, "sites": parsed.site_terms}))
        }
        "history.recent" => {
            let a = app.lock().await;
            let search = a.history.search_settings();
            let requested = params
                .get("days")
                .and_then(|v| v.as_u64())
                .map(|d| u32::try_from(d).unwrap_or(u32::MAX))
                .unwrap_or(search.recent_days);
            let days = search.recent_window(requested);
            if days < requested {
                debug!(requested, days, "recent window clamped");
            }
            let records = a.history.get_recent(days).await;
            let items: Vec<Value> = records.iter().map(record_json).collect();
            Ok(json!({"items": items}))
        }

        // ─── Saved queries ───
        "query.save" => {
            let query = params.get("query").and_then(|v| v.as_str()).ok_or("missing query")?;
            let a = app.lock().await;
            let saved = a.saved_queries.save_query(query).map_err(|e| e.to_string())?;
            serde_json::to_value(saved).map_err(|e| e.to_string())
        }
        "query.list" => {
            let a = app.lock().await;
            let saved = a.saved_queries.list_queries().map_err(|e| e.to_string())?;
            Ok(json!({"items": saved}))
        }
        "query.delete" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let a = app.lock().await;
            a.saved_queries.delete_query(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().await;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().await;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            a.apply_settings();
            Ok(json!({"ok": true}))
        }

        "ping" => Ok(json!({"pong": true})),
        _ => Err(format!("unknown method: {}", method)),
    }
}
