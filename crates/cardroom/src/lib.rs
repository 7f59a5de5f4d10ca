//! # Cardroom
//!
//! Client core for multiplayer card game rooms.
//!
//! A session connects one seat (room code plus player id) to the game
//! server, keeps the canonical game state in step with the server's
//! frames, and turns the player's clicks, drags and buttons into game
//! actions the server will accept. Rendering stays outside: a renderer
//! reads [`ViewSnapshot`]s and hands back [`Gesture`]s and [`Command`]s.
//!
//! ```text
//!              ┌──────────────── cardroom ────────────────┐
//!  renderer ──→│ SessionHandle ─→ SessionCore ─→ Effects   │──→ server
//!          ←── │ SessionEvent  ←─ Reconciler / Resolver    │←── frames
//!              └───────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardroom::prelude::*;
//!
//! # async fn run() -> Result<(), CardroomError> {
//! let config = ClientConfig::default().with_server_url("ws://127.0.0.1:8000");
//! let params = SessionParams::new("ABCD", "1");
//! let (handle, mut events) = Session::start(
//!     config,
//!     params,
//!     WebSocketConnector,
//!     |reason: &str| println!("back to the lobby: {reason}"),
//! )?;
//!
//! while let Some(event) = events.recv().await {
//!     if let SessionEvent::View(view) = event {
//!         if view.is_local_turn {
//!             handle.command(Command::Knock).await?;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod machine;
mod error;
mod http;
mod notice;
mod session;

pub use config::{ActionBinding, ClientConfig, SessionParams};
pub use machine::{Effect, Input, SessionCore, ViewSnapshot};
pub use error::CardroomError;
pub use http::HttpActions;
pub use notice::{Notice, Notices};
pub use session::{Navigator, Session, SessionEvent, SessionHandle};

pub use cardroom_interaction as interaction;
pub use cardroom_protocol as protocol;
pub use cardroom_state as state;
pub use cardroom_transport as transport;

/// The types most sessions need.
pub mod prelude {
    pub use crate::{
        ActionBinding, CardroomError, ClientConfig, Navigator, Notice,
        Session, SessionEvent, SessionHandle, SessionParams, ViewSnapshot,
    };
    pub use cardroom_interaction::{Command, Gesture, Place, ZoneKind, ZoneRef};
    pub use cardroom_protocol::{GameAction, PlayerId, RoomCode, Variant};
    pub use cardroom_state::GameState;
    pub use cardroom_transport::{ConnectionState, WebSocketConnector};
}
