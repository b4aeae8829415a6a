use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Human readable time elapsed between `ts` and `now`. Years are 365 days.
pub fn time_since_at(ts: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(*ts);
    if diff.num_seconds() < 0 {
        return "0s".to_string();
    }

    let days = diff.num_days();
    let hours = diff.num_hours() % 24;
    let mins = diff.num_minutes() % 60;
    let secs = diff.num_seconds() % 60;

    if days > 365 {
        format!("{}y{}d", days / 365, days % 365)
    } else if days > 7 {
        format!("{}d", days)
    } else if days > 0 {
        format!("{}d{}h", days, hours)
    } else if hours > 0 {
        format!("{}h{}m", hours, mins)
    } else if mins > 0 {
        format!("{}m", mins)
    } else {
        format!("{}s", secs)
    }
}

/// Age of an object from its creation timestamp, empty when unset.
pub fn age_at(meta: &ObjectMeta, now: DateTime<Utc>) -> String {
    meta.creation_timestamp
        .as_ref()
        .map(|t| time_since_at(&t.0, now))
        .unwrap_or_default()
}

/// Whether `meta` lists an owner with the given uid.
pub fn is_owned_by(meta: &ObjectMeta, uid: &str) -> bool {
    meta.owner_references
        .as_ref()
        .is_some_and(|owners| owners.iter().any(|o| o.uid == uid))
}
