//! Request/response binding for game actions and game start.
//!
//! The server answers a submitted action with a status code. A 2xx body
//! is ignored: the `game_update` broadcast that follows is what changes
//! state. Anything else carries `{"detail": ...}` and becomes
//! [`CardroomError::ActionRejected`].

use cardroom_protocol::{
    ActionRequest, GameAction, PlayerId, RejectionBody, RoomCode,
    StartRequest, Variant,
};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use crate::{CardroomError, ClientConfig};

/// Posts actions to the server's HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpActions {
    client: reqwest::Client,
    action_url: String,
    start_url: String,
}

impl HttpActions {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            action_url: config.action_endpoint(),
            start_url: config.start_endpoint(),
        }
    }

    /// Submits one action for `player` in `room`.
    ///
    /// # Errors
    /// [`CardroomError::ActionRejected`] on a non-2xx answer,
    /// [`CardroomError::Http`] when the request could not complete.
    pub async fn submit(
        &self,
        room: &RoomCode,
        player: &PlayerId,
        action: GameAction,
    ) -> Result<(), CardroomError> {
        let body = ActionRequest::new(room, player, action);
        debug!(url = %self.action_url, action_type = %body.action_type, "posting action");
        self.post(&self.action_url, &body).await
    }

    /// Asks the server to start a game of `variant` in `room`.
    ///
    /// # Errors
    /// As for [`submit`](Self::submit).
    pub async fn start(
        &self,
        room: &RoomCode,
        variant: Variant,
    ) -> Result<(), CardroomError> {
        let body = StartRequest {
            room_code: room.clone(),
            game_type: variant,
        };
        debug!(url = %self.start_url, %variant, "posting game start");
        self.post(&self.start_url, &body).await
    }

    async fn post<T: Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<(), CardroomError> {
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(CardroomError::ActionRejected(rejection_reason(status, &text)))
    }
}

/// The reason to show for a refused request.
fn rejection_reason(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<RejectionBody>(body)
        .ok()
        .and_then(|b| b.reason())
        .unwrap_or_else(|| format!("server answered {status}"))
}
