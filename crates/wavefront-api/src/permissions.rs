//! Permission tokens understood by Wavefront.
//!
//! These are passed through to the API as-is; the client never interprets them.

pub const AGENT_MANAGEMENT: &str = "agent_management";
pub const ALERTS_MANAGEMENT: &str = "alerts_management";
pub const DASHBOARD_MANAGEMENT: &str = "dashboard_management";
pub const EMBEDDED_CHARTS_MANAGEMENT: &str = "embedded_charts";
pub const EVENTS_MANAGEMENT: &str = "events_management";
pub const EXTERNAL_LINKS_MANAGEMENT: &str = "external_links_management";
pub const HOST_TAG_MANAGEMENT: &str = "host_tag_management";
pub const METRICS_MANAGEMENT: &str = "metrics_management";
pub const USER_MANAGEMENT: &str = "user_management";
pub const INTEGRATIONS_MANAGEMENT: &str = "application_management";
pub const DIRECT_INGESTION: &str = "ingestion";
pub const BATCH_QUERY_PRIORITY: &str = "batch_query_priority";
pub const DERIVED_METRICS_MANAGEMENT: &str = "derived_metrics_management";

/// Every known permission token.
pub const ALL: &[&str] = &[
    AGENT_MANAGEMENT,
    ALERTS_MANAGEMENT,
    DASHBOARD_MANAGEMENT,
    EMBEDDED_CHARTS_MANAGEMENT,
    EVENTS_MANAGEMENT,
    EXTERNAL_LINKS_MANAGEMENT,
    HOST_TAG_MANAGEMENT,
    METRICS_MANAGEMENT,
    USER_MANAGEMENT,
    INTEGRATIONS_MANAGEMENT,
    DIRECT_INGESTION,
    BATCH_QUERY_PRIORITY,
    DERIVED_METRICS_MANAGEMENT,
];

/// Returns true if `token` is one of the known permission tokens.
pub fn is_known(token: &str) -> bool {
    ALL.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tokens() {
        assert!(is_known("ingestion"));
        assert!(is_known(INTEGRATIONS_MANAGEMENT));
        assert!(!is_known("root"));
        assert_eq!(ALL.len(), 13);
    }
}
