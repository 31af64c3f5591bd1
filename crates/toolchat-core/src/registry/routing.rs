//! Tiered message routing
//!
//! Specific domain vocabulary is checked before the broad keyword scan, so
//! a word like "event" cannot pull a directions request over to the
//! calendar server.

use super::descriptor::{ServerDescriptor, CAPABILITY_CALENDAR, CAPABILITY_MAPS, CAPABILITY_WEATHER};

/// One priority tier: marker substrings and the capability they route to
struct RoutingTier {
    name: &'static str,
    markers: &'static [&'static str],
    capability: &'static str,
}

const TIERS: &[RoutingTier] = &[
    RoutingTier {
        name: "route",
        markers: &[
            "から", "まで", "行き方", "道順", "ルート", "経路", "案内", "directions", "navigate",
            "route",
        ],
        capability: CAPABILITY_MAPS,
    },
    RoutingTier {
        name: "schedule",
        markers: &[
            "予定", "スケジュール", "会議", "ミーティング", "calendar", "event", "meeting",
            "schedule",
        ],
        capability: CAPABILITY_CALENDAR,
    },
    RoutingTier {
        name: "weather",
        markers: &["天気", "weather", "気温", "雨", "晴れ", "曇り", "forecast", "予報"],
        capability: CAPABILITY_WEATHER,
    },
];

/// How a server was picked, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch {
    /// A priority tier matched (tier name)
    Tier(&'static str),
    /// The broad keyword scan matched
    Keyword,
}

/// Pick a server for `message` among `servers`
///
/// Only enabled servers are considered. Returns the chosen descriptor and
/// how it was matched.
pub fn route_message<'a>(
    message: &str,
    servers: &'a [ServerDescriptor],
) -> Option<(&'a ServerDescriptor, RouteMatch)> {
    let lowered = message.to_lowercase();
    let enabled: Vec<&ServerDescriptor> = servers.iter().filter(|s| s.enabled).collect();

    for tier in TIERS {
        if !tier.markers.iter().any(|m| lowered.contains(m)) {
            continue;
        }
        if let Some(server) = enabled.iter().copied().find(|s| s.has_capability(tier.capability)) {
            return Some((server, RouteMatch::Tier(tier.name)));
        }
    }

    enabled
        .into_iter()
        .find(|s| s.matches_keywords(&lowered))
        .map(|s| (s, RouteMatch::Keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::descriptor::builtin_servers;

    fn routed_id(message: &str, servers: &[ServerDescriptor]) -> Option<String> {
        route_message(message, servers).map(|(s, _)| s.id.clone())
    }

    #[test]
    fn test_route_beats_calendar() {
        let servers = builtin_servers();
        // "event" and "会議" are calendar markers, "route"/"から" are route markers
        assert_eq!(
            routed_id("Find a route to the event venue", &servers).as_deref(),
            Some("googlemaps_service")
        );
        assert_eq!(
            routed_id("会議室から駅までの行き方", &servers).as_deref(),
            Some("googlemaps_service")
        );
    }

    #[test]
    fn test_calendar_beats_weather() {
        let servers = builtin_servers();
        assert_eq!(
            routed_id("明日の予定と天気", &servers).as_deref(),
            Some("google_calendar_service")
        );
    }

    #[test]
    fn test_weather_tier() {
        let servers = builtin_servers();
        let (server, how) = route_message("今日の千葉の天気を教えて", &servers).unwrap();
        assert_eq!(server.id, "weather_service");
        assert_eq!(how, RouteMatch::Tier("weather"));
    }

    #[test]
    fn test_keyword_fallback_tier() {
        let servers = builtin_servers();
        let (server, how) = route_message("Where is the nearest 駅?", &servers).unwrap();
        assert_eq!(server.id, "googlemaps_service");
        assert_eq!(how, RouteMatch::Keyword);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let servers = vec![ServerDescriptor::new("kb", "KB", "docs", "http://kb")
            .with_keywords(["HandBook"])];
        assert_eq!(routed_id("open the HANDBOOK please", &servers).as_deref(), Some("kb"));
    }

    #[test]
    fn test_no_match() {
        let servers = builtin_servers();
        assert!(route_message("Tell me a joke about cats", &servers).is_none());
    }

    #[test]
    fn test_disabled_servers_are_skipped() {
        let mut servers = builtin_servers();
        servers[0].enabled = false; // weather
        assert!(route_message("weather forecast please", &servers).is_none());

        let mut servers = builtin_servers();
        servers[2].enabled = false; // maps
        // Route markers hit but maps is off: falls through to later tiers
        assert_eq!(
            routed_id("directions to the meeting", &servers).as_deref(),
            Some("google_calendar_service")
        );
    }
}
