// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video dashboard and streaming models.

use crate::time_utils::from_unix_seconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A video as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Creation time (ISO 8601, as sent by the backend)
    #[serde(default)]
    pub created_at: Option<String>,
    /// Signed, video-scoped token required to fetch the stream URL
    pub playback_token: String,
}

/// Response of `GET /dashboard`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dashboard {
    pub videos: Vec<Video>,
    pub count: usize,
}

/// Response of `GET /video/:id/stream`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamResponse {
    pub video_id: String,
    pub title: String,
    /// Playback token expiry (Unix seconds)
    pub expires_at: i64,
    #[serde(default)]
    pub youtube_id: Option<String>,
    /// Embed URL, when the backend hands out a ready-made one
    #[serde(default)]
    pub stream_url: Option<String>,
}

impl StreamResponse {
    /// Playback token expiry as a timestamp.
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        from_unix_seconds(self.expires_at)
    }

    /// Whether the playback window has already closed.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at_utc().is_none_or(|expiry| expiry <= now)
    }
}

/// Body of `POST /video/:id/track`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WatchEvent {
    /// Seconds watched
    pub duration: u64,
    /// Whether playback reached the end
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::format_utc_rfc3339;

    #[test]
    fn test_dashboard_from_backend_json() {
        let json = r#"{
            "videos": [{
                "id": "v1",
                "title": "Intro",
                "description": "First video",
                "thumbnail_url": "https://img.example.com/v1.jpg",
                "created_at": "2024-01-01T10:00:00",
                "playback_token": "pb-v1"
            }],
            "count": 1
        }"#;
        let dashboard: Dashboard = serde_json::from_str(json).unwrap();
        assert_eq!(dashboard.count, 1);
        assert_eq!(dashboard.videos[0].playback_token, "pb-v1");
    }

    #[test]
    fn test_stream_expiry() {
        let stream = StreamResponse {
            video_id: "v1".to_string(),
            title: "Intro".to_string(),
            expires_at: 1_704_103_200,
            youtube_id: Some("dQw4w9WgXcQ".to_string()),
            stream_url: None,
        };

        let expiry = stream.expires_at_utc().unwrap();
        assert_eq!(format_utc_rfc3339(expiry), "2024-01-01T10:00:00Z");
        assert!(stream.is_expired_at(expiry));
        assert!(!stream.is_expired_at(expiry - chrono::Duration::seconds(1)));
    }
}
