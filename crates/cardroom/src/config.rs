//! Client configuration and per-session parameters.

use std::time::Duration;

use cardroom_protocol::{PlayerId, RoomCode, Variant};

use crate::CardroomError;

// ---------------------------------------------------------------------------
// ActionBinding
// ---------------------------------------------------------------------------

/// How a [`GameAction`](cardroom_protocol::GameAction) reaches the server.
///
/// Both bindings carry the same logical action. The channel binding pushes
/// a `game_action` frame; the HTTP binding posts to the action endpoint and
/// waits for the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionBinding {
    #[default]
    Channel,
    Http,
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Where the server lives and how the session driver is sized.
///
/// Start from `ClientConfig::default()` and override with the `with_*`
/// setters.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the persistent channel (`ws://` or `wss://`).
    pub server_url: String,

    /// Base URL for request/response calls.
    pub http_url: String,

    /// Path prefix shared by every endpoint.
    pub api_prefix: String,

    pub action_binding: ActionBinding,

    /// How long a transient notice stays up.
    pub notice_ttl: Duration,

    /// Capacity of the command channel into the session task.
    pub command_capacity: usize,

    /// Capacity of the event channel out to the renderer.
    pub event_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:8000".to_string(),
            http_url: "http://127.0.0.1:8000".to_string(),
            api_prefix: "/api/v1".to_string(),
            action_binding: ActionBinding::Channel,
            notice_ttl: Duration::from_secs(3),
            command_capacity: 64,
            event_capacity: 256,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    #[must_use]
    pub fn with_http_url(mut self, url: impl Into<String>) -> Self {
        self.http_url = url.into();
        self
    }

    #[must_use]
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_action_binding(mut self, binding: ActionBinding) -> Self {
        self.action_binding = binding;
        self
    }

    #[must_use]
    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    /// Sets the command channel capacity. Clamped to at least 1.
    #[must_use]
    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(1);
        self
    }

    /// Sets the event channel capacity. Clamped to at least 1.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// `{server_url}{api_prefix}/ws/{room}/{player}`
    pub fn channel_endpoint(&self, room: &RoomCode, player: &PlayerId) -> String {
        format!(
            "{}{}/ws/{}/{}",
            trim_base(&self.server_url),
            self.prefix(),
            room,
            player
        )
    }

    /// `{http_url}{api_prefix}/game-action/`
    pub fn action_endpoint(&self) -> String {
        format!("{}{}/game-action/", trim_base(&self.http_url), self.prefix())
    }

    /// `{http_url}{api_prefix}/start-game/`
    pub fn start_endpoint(&self) -> String {
        format!("{}{}/start-game/", trim_base(&self.http_url), self.prefix())
    }

    fn prefix(&self) -> String {
        let trimmed = self.api_prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

fn trim_base(url: &str) -> &str {
    url.trim_end_matches('/')
}

// ---------------------------------------------------------------------------
// SessionParams
// ---------------------------------------------------------------------------

/// Identifies one seat in one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    pub room_code: RoomCode,
    pub player_id: PlayerId,
    /// The variant the lobby picked, used until the server names one.
    pub variant: Option<Variant>,
}

impl SessionParams {
    pub fn new(room_code: impl AsRef<str>, player_id: impl AsRef<str>) -> Self {
        Self {
            room_code: RoomCode::new(room_code),
            player_id: PlayerId::new(player_id),
            variant: None,
        }
    }

    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// # Errors
    /// Returns [`CardroomError::MissingSessionParams`] naming the first
    /// blank parameter.
    pub fn validate(&self) -> Result<(), CardroomError> {
        if self.room_code.is_empty() {
            return Err(CardroomError::MissingSessionParams("room_code"));
        }
        if self.player_id.is_empty() {
            return Err(CardroomError::MissingSessionParams("player_id"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.action_binding, ActionBinding::Channel);
        assert_eq!(config.notice_ttl, Duration::from_secs(3));
        assert_eq!(config.command_capacity, 64);
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn test_endpoints_from_defaults() {
        let config = ClientConfig::default();
        let room = RoomCode::new("ABCD");
        let player = PlayerId::from("7");
        assert_eq!(
            config.channel_endpoint(&room, &player),
            "ws://127.0.0.1:8000/api/v1/ws/ABCD/7"
        );
        assert_eq!(
            config.action_endpoint(),
            "http://127.0.0.1:8000/api/v1/game-action/"
        );
        assert_eq!(
            config.start_endpoint(),
            "http://127.0.0.1:8000/api/v1/start-game/"
        );
    }

    #[test]
    fn test_endpoints_tolerate_stray_slashes() {
        let config = ClientConfig::default()
            .with_server_url("wss://cards.example/")
            .with_http_url("https://cards.example/")
            .with_api_prefix("api/v2/");
        let room = RoomCode::new("R1");
        let player = PlayerId::from("p");
        assert_eq!(
            config.channel_endpoint(&room, &player),
            "wss://cards.example/api/v2/ws/R1/p"
        );
        assert_eq!(
            config.action_endpoint(),
            "https://cards.example/api/v2/game-action/"
        );
    }

    #[test]
    fn test_empty_prefix() {
        let config = ClientConfig::default().with_api_prefix("");
        assert_eq!(
            config.start_endpoint(),
            "http://127.0.0.1:8000/start-game/"
        );
    }

    #[test]
    fn test_capacities_clamp_to_one() {
        let config = ClientConfig::default()
            .with_command_capacity(0)
            .with_event_capacity(0);
        assert_eq!(config.command_capacity, 1);
        assert_eq!(config.event_capacity, 1);
    }

    #[test]
    fn test_params_validate() {
        assert!(SessionParams::new("ABCD", "1").validate().is_ok());
        assert!(matches!(
            SessionParams::new("  ", "1").validate(),
            Err(CardroomError::MissingSessionParams("room_code"))
        ));
        assert!(matches!(
            SessionParams::new("ABCD", "").validate(),
            Err(CardroomError::MissingSessionParams("player_id"))
        ));
    }
}
