//! Tool server descriptors and the built-in catalog

use serde::{Deserialize, Serialize};

/// Capability tag of the maps/navigation server
pub const CAPABILITY_MAPS: &str = "maps";
/// Capability tag of the calendar server
pub const CAPABILITY_CALENDAR: &str = "calendar";
/// Capability tag of the weather server
pub const CAPABILITY_WEATHER: &str = "weather";

/// An external tool server the router can pick
///
/// Serialized with the field names used by the server list file
/// (`baseUrl`, `toolKeywords`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    /// Server id, also the first path segment on the tool server
    pub id: String,
    /// Display name
    pub name: String,
    /// What the server offers, shown to the LLM when deciding
    pub description: String,
    /// Base URL, with or without scheme
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    /// Disabled servers are never routed to
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Capability tags (e.g. "weather", "maps"); required on input, may be empty
    pub capabilities: Vec<String>,
    /// Substrings that route a message here, matched case-insensitively.
    /// Required on input, may be empty.
    #[serde(rename = "toolKeywords", alias = "routingKeywords")]
    pub routing_keywords: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

impl ServerDescriptor {
    /// Create an enabled descriptor with no tags or keywords
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            base_url: base_url.into(),
            enabled: true,
            capabilities: Vec::new(),
            routing_keywords: Vec::new(),
        }
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routing_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether the descriptor carries the given capability tag
    pub fn has_capability(&self, tag: &str) -> bool {
        self.capabilities.iter().any(|c| c.eq_ignore_ascii_case(tag))
    }

    /// Whether any routing keyword occurs in an already lower-cased message
    pub fn matches_keywords(&self, lowered_message: &str) -> bool {
        self.routing_keywords
            .iter()
            .filter(|k| !k.is_empty())
            .any(|k| lowered_message.contains(&k.to_lowercase()))
    }
}

/// The servers every registry starts with, in routing order
pub fn builtin_servers() -> Vec<ServerDescriptor> {
    vec![
        ServerDescriptor::new(
            "weather_service",
            "Weather Service",
            "US天気情報を提供するMCPサーバー",
            "http://localhost:5010",
        )
        .with_capabilities(["weather", "forecast", "alerts"])
        .with_keywords([
            "天気", "weather", "温度", "雨", "晴れ", "曇り", "forecast", "気温", "湿度", "警報",
            "アラート",
        ]),
        ServerDescriptor::new(
            "google_calendar_service",
            "Google Calendar MCP",
            "Google Calendar統合 - イベント作成・管理・検索",
            "http://localhost:5011",
        )
        .with_capabilities(["calendar", "events", "scheduling", "reminders"])
        .with_keywords([
            "カレンダー", "calendar", "予定", "スケジュール", "schedule", "event", "イベント",
            "会議", "meeting", "ミーティング", "打ち合わせ", "予約", "booking",
            "リマインダー", "reminder", "通知", "notification", "アラーム", "alarm",
            "今日の予定", "明日の予定", "今週", "来週", "来月", "次回", "空いている時間",
            "free time", "busy", "空き時間", "available", "空きスロット",
        ]),
        ServerDescriptor::new(
            "googlemaps_service",
            "Google Maps Service",
            "地図・場所検索・ルート案内を提供",
            "http://localhost:5012",
        )
        .with_capabilities(["maps", "directions", "places", "geocoding"])
        .with_keywords([
            "地図", "場所", "住所", "ルート", "道順", "map", "location", "address", "directions",
            "navigate", "位置", "geocode", "駅", "から", "まで", "行き方", "案内", "経路", "電車",
            "バス", "車", "歩き", "最寄り",
        ]),
    ]
}

/// Example descriptor written by `ServerRegistry::sample_config`
pub fn sample_server() -> ServerDescriptor {
    ServerDescriptor::new(
        "sample_api",
        "Sample API Server",
        "Description of the sample API server",
        "https://your-api-server.com",
    )
    .with_capabilities(["search", "data"])
    .with_keywords(["検索", "データ", "search", "info"])
}
