use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

const OCCURRED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Payload describing one recorded head impact, in the shape the team
/// dashboard ingests.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactEvent {
    pub player_name: String,
    pub team: String,
    #[serde(serialize_with = "serialize_occurred_at")]
    pub occurred_at: DateTime<Utc>,
    pub acceleration_g: f64,
    pub angular_velocity: f64,
}

fn serialize_occurred_at<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&at.format(OCCURRED_AT_FORMAT))
}
