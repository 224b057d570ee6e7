use super::DEFAULT_EVENT_TYPE;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

pub const MAX_TRACK_ID_LENGTH: usize = 200;
const MAX_USER_AGENT_LENGTH: usize = 500;
const MAX_IP_LENGTH: usize = 15;

const UNKNOWN_COUNTRY: &str = "XX";
const UNKNOWN_IP: &str = "Unknown";

/// Wire shape of a listen-event submission. Older players send the event
/// type under `event`, current ones under `eventType`.
#[derive(Debug, Deserialize)]
pub struct ListenEventBody {
    #[serde(rename = "trackId", default)]
    pub track_id: Option<String>,
    #[serde(rename = "eventType", alias = "event", default)]
    pub event_type: Option<String>,
}

/// A validated listen event, ready for counting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenEvent {
    pub track_id: String,
    pub event_type: String,
}

impl ListenEvent {
    /// Validates a parsed body. The track id is the only required field and
    /// doubles as the track's primary key everywhere downstream.
    pub fn from_body(body: ListenEventBody) -> Result<ListenEvent, &'static str> {
        let track_id = match body.track_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err("trackId is required and must be valid."),
        };
        if track_id.len() > MAX_TRACK_ID_LENGTH || track_id.contains('<') || track_id.contains('>')
        {
            return Err("trackId is required and must be valid.");
        }

        let event_type = match body.event_type {
            Some(event_type) if !event_type.is_empty() => event_type,
            _ => DEFAULT_EVENT_TYPE.to_string(),
        };

        Ok(ListenEvent {
            track_id,
            event_type,
        })
    }
}

/// Ambient request context an event is classified under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    pub ip: String,
    pub country: String,
    pub user_agent: String,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

impl ClientContext {
    pub fn from_headers(headers: &HeaderMap) -> ClientContext {
        let ip = ["x-forwarded-for", "cf-connecting-ip", "x-real-ip"]
            .iter()
            .find_map(|name| header_str(headers, name))
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| UNKNOWN_IP.to_string());

        let country = ["x-vercel-ip-country", "cf-ipcountry"]
            .iter()
            .find_map(|name| header_str(headers, name))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());

        let user_agent = header_str(headers, "user-agent")
            .unwrap_or("Unknown")
            .to_string();

        ClientContext {
            ip,
            country,
            user_agent,
        }
    }

    /// Ip as used in the diagnostic-log key. Truncated so a forged header
    /// cannot blow up the key space.
    pub fn short_ip(&self) -> &str {
        match self.ip.char_indices().nth(MAX_IP_LENGTH) {
            Some((i, _)) => &self.ip[..i],
            None => &self.ip,
        }
    }

    pub fn short_user_agent(&self) -> &str {
        match self.user_agent.char_indices().nth(MAX_USER_AGENT_LENGTH) {
            Some((i, _)) => &self.user_agent[..i],
            None => &self.user_agent,
        }
    }
}

/// One diagnostic-log record, as written at ingestion time and read back by
/// the report. Unknown extra fields in stored records are ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub ip: String,
    pub country: String,
    #[serde(rename = "userAgent")]
    pub user_agent: String,
    #[serde(rename = "trackId")]
    pub track_id: String,
    #[serde(rename = "eventType")]
    pub event_type: String,
    pub timestamp: String,
}
