//! The session core: one synchronous step per input.
//!
//! [`SessionCore`] owns everything a session knows (the reconciler, the
//! resolver, notices and the observed connection state) and never does
//! I/O. Each call to [`SessionCore::handle`] consumes one [`Input`] and
//! returns the [`Effect`]s the driver must carry out, in order.
//!
//! ```text
//!  transport ──Opened/Frame/Closed──┐
//!  renderer ──Gesture/Command/Leave─┼──→ SessionCore::handle ──→ [Effect]
//!  timer ───────────────Tick────────┘
//! ```
//!
//! Keeping I/O out means every session rule is testable with plain
//! frames and an `Instant`.

use std::sync::Arc;
use std::time::Instant;

use cardroom_interaction::{
    ActionTable, Command, Gesture, Resolution, Resolver,
};
use cardroom_protocol::{
    ClientMessage, GameAction, JsonCodec, PlayerId, RoomCode, ServerEvent,
    Variant, decode_event,
};
use cardroom_state::{
    Applied, GameState, HandOrder, InteractionError, Reconciler, Selection,
};
use cardroom_transport::ConnectionState;
use tracing::{debug, error, info, warn};

use crate::{CardroomError, ClientConfig, Notice, Notices, SessionParams};

const CONNECTION_LOST: &str = "connection lost";
const NOT_CONNECTED: &str = "not connected";

// ---------------------------------------------------------------------------
// Input / Effect
// ---------------------------------------------------------------------------

/// Something that happened to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// The channel is open.
    Opened,
    /// One inbound frame.
    Frame(Vec<u8>),
    /// The channel failed to open or broke.
    TransportFailed(String),
    /// The server closed the channel.
    Closed,
    Gesture(Gesture),
    Command(Command),
    /// An outbound action could not be delivered or was refused.
    ActionFailed(String),
    /// The host asks to start a game of `Variant`.
    StartGame(Variant),
    Chat(String),
    /// The player leaves the room.
    Leave,
    /// Time passed; expire notices.
    Tick,
}

/// Something the driver must do.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Push a frame over the channel.
    Send(ClientMessage),
    /// Submit a game action over the configured binding.
    Dispatch(GameAction),
    /// Leave the session view.
    NavigateHome(String),
    /// Close the channel.
    Close,
}

/// Read-only bundle handed to renderers.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub state: Option<Arc<GameState>>,
    pub is_local_turn: bool,
    pub selection: Selection,
    pub hand_order: HandOrder,
    pub connection: ConnectionState,
}

// ---------------------------------------------------------------------------
// SessionCore
// ---------------------------------------------------------------------------

/// The I/O-free state machine behind a session.
#[derive(Debug)]
pub struct SessionCore {
    room: RoomCode,
    reconciler: Reconciler,
    resolver: Resolver,
    notices: Notices,
    codec: JsonCodec,
    connection: ConnectionState,
    /// Set once the session has asked to leave the view.
    departed: bool,
}

impl SessionCore {
    /// Builds a core for one seat, using every built-in variant.
    ///
    /// # Errors
    /// Returns [`CardroomError::MissingSessionParams`] when the room code
    /// or player id is blank.
    pub fn new(
        config: &ClientConfig,
        params: &SessionParams,
    ) -> Result<Self, CardroomError> {
        Self::with_table(config, params, ActionTable::standard())
    }

    /// Like [`new`](Self::new) with a custom variant table.
    ///
    /// # Errors
    /// Returns [`CardroomError::MissingSessionParams`] when the room code
    /// or player id is blank.
    pub fn with_table(
        config: &ClientConfig,
        params: &SessionParams,
        table: ActionTable,
    ) -> Result<Self, CardroomError> {
        params.validate()?;
        Ok(Self {
            room: params.room_code.clone(),
            reconciler: Reconciler::new(params.player_id.clone()),
            resolver: Resolver::new(table).with_variant(params.variant),
            notices: Notices::new(config.notice_ttl),
            codec: JsonCodec,
            connection: ConnectionState::Connecting,
            departed: false,
        })
    }

    pub fn room(&self) -> &RoomCode {
        &self.room
    }

    pub fn local_player(&self) -> &PlayerId {
        self.reconciler.local_player()
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Whether the session has navigated away.
    pub fn departed(&self) -> bool {
        self.departed
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.current()
    }

    /// When the next `Tick` is due, if a notice is waiting to expire.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.notices.next_deadline()
    }

    pub fn view(&self) -> ViewSnapshot {
        ViewSnapshot {
            state: self.reconciler.state().cloned(),
            is_local_turn: self.reconciler.is_local_turn(),
            selection: self.reconciler.selection().clone(),
            hand_order: self.reconciler.hand_order().clone(),
            connection: self.connection,
        }
    }

    /// Consumes one input and returns what the driver must do.
    pub fn handle(&mut self, input: Input, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        match input {
            Input::Opened => self.on_opened(&mut effects),
            Input::Frame(frame) => self.on_frame(&frame, now, &mut effects),
            Input::TransportFailed(reason) => {
                self.on_lost(ConnectionState::Errored, &reason, &mut effects);
            }
            Input::Closed => {
                self.on_lost(ConnectionState::Closed, "closed by server", &mut effects);
            }
            // Checked before resolving, which may consume the selection.
            Input::Gesture(gesture) => {
                if gesture.may_dispatch() && !self.usable(now) {
                    return effects;
                }
                match self.resolver.resolve(&gesture, &mut self.reconciler) {
                    Ok(resolution) => self.on_resolution(resolution, &mut effects),
                    Err(e) => self.on_refused(&e, now),
                }
            }
            Input::Command(command) => {
                if self.usable(now) {
                    let resolution =
                        self.resolver.resolve_command(&command, &mut self.reconciler);
                    self.on_resolution(resolution, &mut effects);
                }
            }
            Input::ActionFailed(reason) => {
                debug!(%reason, "action failed");
                self.notices.push(reason, now);
            }
            Input::StartGame(variant) => {
                if self.usable(now) {
                    info!(room = %self.room, %variant, "starting game");
                    effects.push(Effect::Send(ClientMessage::StartGame {
                        room_code: self.room.clone(),
                        game_type: variant,
                    }));
                }
            }
            Input::Chat(text) => {
                let message = text.trim();
                if !message.is_empty() && self.usable(now) {
                    effects.push(Effect::Send(ClientMessage::Chat {
                        message: message.to_string(),
                    }));
                }
            }
            Input::Leave => self.on_leave(&mut effects),
            Input::Tick => {
                self.notices.expire(now);
            }
        }
        effects
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    fn on_opened(&mut self, effects: &mut Vec<Effect>) {
        if self.departed {
            return;
        }
        self.connection = ConnectionState::Open;
        info!(room = %self.room, player_id = %self.local_player(), "session open");
        effects.push(Effect::Send(ClientMessage::GetState));
    }

    fn on_lost(
        &mut self,
        state: ConnectionState,
        reason: &str,
        effects: &mut Vec<Effect>,
    ) {
        if self.connection.is_terminal() {
            return;
        }
        self.connection = state;
        if self.departed {
            debug!(%reason, "channel closed after leaving");
            return;
        }
        error!(room = %self.room, %reason, "connection lost");
        self.notices.set_banner(CONNECTION_LOST);
        self.departed = true;
        effects.push(Effect::NavigateHome(CONNECTION_LOST.to_string()));
    }

    fn on_leave(&mut self, effects: &mut Vec<Effect>) {
        if self.departed {
            return;
        }
        info!(room = %self.room, player_id = %self.local_player(), "leaving room");
        self.departed = true;
        if !self.connection.is_terminal() {
            effects.push(Effect::Send(ClientMessage::LeaveRoom));
            effects.push(Effect::Close);
        }
        effects.push(Effect::NavigateHome("left the room".to_string()));
    }

    // -----------------------------------------------------------------------
    // Frames
    // -----------------------------------------------------------------------

    fn on_frame(&mut self, frame: &[u8], now: Instant, effects: &mut Vec<Effect>) {
        if self.connection.is_terminal() || self.departed {
            debug!(bytes = frame.len(), "frame after close ignored");
            return;
        }
        let event = match decode_event(&self.codec, frame) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "dropping undecodable frame");
                return;
            }
        };

        match event {
            ServerEvent::Snapshot { state, variant } => {
                let applied = self.reconciler.apply_snapshot(state, variant);
                self.note(&applied);
            }
            ServerEvent::Delta {
                patch,
                tag,
                actor,
                rejection,
            } => {
                if let Some(reason) = rejection {
                    self.on_rejection(reason, actor.as_ref(), now);
                    return;
                }
                debug!(tag = ?tag, actor = ?actor, "game update");
                let applied = self.reconciler.apply_delta(patch);
                self.note(&applied);
            }
            ServerEvent::GameStarted { state, variant } => {
                info!(room = %self.room, %variant, "game started");
                let applied = self.reconciler.apply_game_started(state, variant);
                self.note(&applied);
            }
            ServerEvent::GameOver { scores, winner } => {
                info!(
                    room = %self.room,
                    winner = ?winner.as_ref().map(|w| &w.id),
                    "game over"
                );
                self.reconciler.apply_game_over(scores, winner);
            }
            ServerEvent::Error { message } => {
                debug!(%message, "server error");
                self.notices.push(message, now);
            }
            ServerEvent::PlayerLeft { player, game_ended } => {
                if &player == self.local_player() {
                    info!(player_id = %player, "removed from room");
                    self.departed = true;
                    effects.push(Effect::Close);
                    effects.push(Effect::NavigateHome(
                        "removed from the room".to_string(),
                    ));
                    return;
                }
                info!(player_id = %player, game_ended, "player left");
                let applied =
                    self.reconciler.apply_player_left(&player, game_ended);
                self.note(&applied);
            }
            ServerEvent::RoomNotice {
                kind,
                from,
                message,
            } => {
                debug!(?kind, from = ?from, message = ?message, "room notice");
            }
        }
    }

    /// Other players' failures are theirs to see.
    fn on_rejection(
        &mut self,
        reason: String,
        actor: Option<&PlayerId>,
        now: Instant,
    ) {
        match actor {
            Some(actor) if actor != self.local_player() => {
                debug!(player_id = %actor, %reason, "another player's action failed");
            }
            _ => {
                debug!(%reason, "action rejected");
                self.notices.push(reason, now);
            }
        }
    }

    fn note(&self, applied: &Applied) {
        if applied.turn_changed {
            debug!(is_local_turn = self.reconciler.is_local_turn(), "turn changed");
        }
        if applied.hand_reset {
            debug!(cards = self.reconciler.local_hand().len(), "hand order rebuilt");
        }
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    fn on_resolution(&self, resolution: Resolution, effects: &mut Vec<Effect>) {
        if let Resolution::Dispatch(action) = resolution {
            debug!(%action, "dispatching action");
            effects.push(Effect::Dispatch(action));
        }
    }

    fn on_refused(&mut self, err: &InteractionError, now: Instant) {
        debug!(error = %err, "gesture refused");
        self.notices.push(err.to_string(), now);
    }

    /// Whether outbound messages can still go anywhere. Says so when not.
    fn usable(&mut self, now: Instant) -> bool {
        if self.departed || self.connection.is_terminal() {
            self.notices.push(NOT_CONNECTED, now);
            return false;
        }
        true
    }
}

// =========================================================================
// Tests
// =========================================================================
