use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// The per-tick record visible to templates and scripts.
///
/// Templates reference its fields by name (`{{name}}`, `{{result.total}}`);
/// scripts see the same shape as the Lua global `ctx`. One context is built
/// per tick and discarded after action dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct RunContext {
    /// Name of the alert this tick belongs to.
    pub name: String,
    /// Seconds since epoch at the tick instant. Always `time.timestamp()`.
    pub started_ts: u64,
    /// The tick instant, serialized as RFC3339.
    pub time: DateTime<Utc>,
    /// Populated once the search step has run.
    pub result: Option<SearchResult>,
}

impl RunContext {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            started_ts: now.timestamp() as u64,
            time: now,
            result: None,
        }
    }

    /// The context as a dynamic value, ready for template rendering or
    /// script marshalling.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("run context serializes to a map")
    }
}

/// One document matched by a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename(deserialize = "_index"), default)]
    pub index: String,
    #[serde(rename(deserialize = "_type"), default)]
    pub r#type: String,
    #[serde(rename(deserialize = "_id"), default)]
    pub id: String,
    #[serde(rename(deserialize = "_score"), default, deserialize_with = "f64_or_zero")]
    pub score: f64,
    #[serde(rename(deserialize = "_source"), default)]
    pub source: Map<String, Value>,
}

/// The `hits` block of a search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitBlock {
    #[serde(default)]
    pub total: u64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub max_score: f64,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// A decoded search response.
///
/// Deserializes from the Elasticsearch wire shape, where the hit counts
/// sit nested under `hits`. When serialized back out for templates and
/// scripts the block is inlined, so consumers read `result.total` and
/// `result.hits[i]` rather than `result.hits.total`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "took", default)]
    pub took_ms: u64,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub hits: HitBlock,
    #[serde(default)]
    pub aggregations: Map<String, Value>,
}

impl Serialize for SearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6))?;
        map.serialize_entry("took_ms", &self.took_ms)?;
        map.serialize_entry("timed_out", &self.timed_out)?;
        map.serialize_entry("total", &self.hits.total)?;
        map.serialize_entry("max_score", &self.hits.max_score)?;
        map.serialize_entry("hits", &self.hits.hits)?;
        map.serialize_entry("aggregations", &self.aggregations)?;
        map.end()
    }
}

/// Elasticsearch emits `null` scores for unscored queries; treat them as 0.
fn f64_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
