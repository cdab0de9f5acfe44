use serde_json::{Map, Value};

/// Parse a write-call body into a JSON object.
///
/// Browsers posting in `no-cors` mode cannot declare `application/json`, so
/// anything that is not explicitly form-encoded is read as JSON.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Map<String, Value>, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    let ct = content_type.unwrap_or("application/json");

    let value = if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)?
    } else {
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))?
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(format!("Expected a JSON object, got {}", kind(&other))),
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Result<Value, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    let mut map = Map::new();
    for (k, v) in form_urlencoded::parse(body_str.as_bytes()) {
        map.insert(k.into_owned(), Value::String(v.into_owned()));
    }
    Ok(Value::Object(map))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
