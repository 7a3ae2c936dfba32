//! Event fixtures for unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::types::InteractionEvent;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// `source` replies to `target` with `content`, `hours` after the base time.
pub fn event(
    source: &str,
    target: &str,
    content: &str,
    parent: Option<&str>,
    hours: i64,
) -> InteractionEvent {
    InteractionEvent {
        source_user_id: source.to_string(),
        target_user_id: target.to_string(),
        content_id: content.to_string(),
        parent_content_id: parent.map(str::to_string),
        timestamp: base_time() + Duration::hours(hours),
        subreddit_context: "health".to_string(),
        is_flagged: false,
    }
}

/// Bidirectional all-pairs replies among `users`, one content item per
/// direction; content ids are prefixed with `tag`.
pub fn clique(users: &[&str], tag: &str) -> Vec<InteractionEvent> {
    let mut events = Vec::new();
    for (i, a) in users.iter().enumerate() {
        for (j, b) in users.iter().enumerate() {
            if i != j {
                events.push(event(a, b, &format!("{tag}-{a}-{b}"), None, 0));
            }
        }
    }
    events
}
