use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// Wrap a payload in the uniform `{"status":"success","data":...}` envelope.
pub fn success<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "status": "success", "data": data }))
}
