use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat};
use serde_json::{Map, Number, Value as Json};

use dp_core::{Event, Timestamp, TimeWrapper, Value};

/// Decode one JSON-lines record into an [`Event`].
///
/// Fields named in `time_fields` that hold RFC 3339 strings become
/// [`Value::Timestamp`]. Anything else in those fields is kept as decoded,
/// so the filter sees it as not-a-time and tags the event.
///
/// | JSON                   | → | Event value           |
/// |------------------------|---|-----------------------|
/// | null / bool            | → | Null / Bool           |
/// | integer (fits i64)     | → | Int                   |
/// | other number           | → | Float                 |
/// | string                 | → | Str (or Timestamp)    |
/// | array / object         | → | Array / Object        |
pub fn decode_event(line: &str, time_fields: &[String]) -> anyhow::Result<Event> {
    let json: Json = serde_json::from_str(line)?;
    let Json::Object(map) = json else {
        anyhow::bail!("expected a JSON object, got {}", json_kind(&json));
    };

    let mut fields = HashMap::with_capacity(map.len());
    for (name, raw) in map {
        let value = if time_fields.iter().any(|f| *f == name) {
            decode_time(raw)
        } else {
            from_json(raw)
        };
        fields.insert(name, value);
    }
    Ok(Event { fields })
}

/// Render an [`Event`] as a JSON object. Keys come out sorted.
pub fn encode_event(event: &Event) -> Json {
    let map: Map<String, Json> = event
        .fields
        .iter()
        .map(|(k, v)| (k.clone(), to_json(v)))
        .collect();
    Json::Object(map)
}

fn decode_time(raw: Json) -> Value {
    if let Json::String(s) = &raw {
        let ts = DateTime::parse_from_rfc3339(s)
            .ok()
            .and_then(|t| Timestamp::from_instant(&t.to_utc()));
        if let Some(ts) = ts {
            return Value::Timestamp(ts);
        }
    }
    from_json(raw)
}

fn from_json(raw: Json) -> Value {
    match raw {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::Str(s),
        Json::Array(items) => Value::Array(items.into_iter().map(from_json).collect()),
        Json::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, from_json(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number((*i).into()),
        // NaN and infinities have no JSON form
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Str(s) => Json::String(s.clone()),
        Value::Array(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Object(map) => Json::Object(
            map.iter().map(|(k, v)| (k.clone(), to_json(v))).collect(),
        ),
        Value::Time(t) => Json::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        Value::Timestamp(ts) => {
            Json::String(ts.time().to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
        Value::Date(d) => Json::String(d.format("%Y-%m-%d").to_string()),
        Value::Naive(dt) => Json::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
