//! The async session driver.
//!
//! [`Session::start`] spawns one task that owns the [`Link`] and the
//! [`SessionCore`]. The task waits on three sources and feeds whichever
//! fires into the core:
//!
//! ```text
//!   link.recv() ────────→ Frame / Closed / TransportFailed ─┐
//!   SessionHandle ──────→ Gesture / Command / Leave ... ─────┼─→ core.handle
//!   next notice deadline → Tick ─────────────────────────────┘
//! ```
//!
//! The effects the core returns are carried out before the next input is
//! taken, then the renderer gets a fresh [`SessionEvent::View`].

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use cardroom_interaction::{Command, Gesture};
use cardroom_protocol::{
    ClientMessage, Codec, GameAction, JsonCodec, Variant,
};
use cardroom_transport::{
    Connection, ConnectionState, Connector, Link, TransportError,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::machine::{Effect, Input, SessionCore, ViewSnapshot};
use crate::{
    ActionBinding, CardroomError, ClientConfig, HttpActions, Notice,
    SessionParams,
};

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

/// Leaves the session view. Called once per session, on missing
/// parameters, leaving, removal by the server, or a lost connection.
pub trait Navigator: Send + Sync + 'static {
    fn navigate_home(&self, reason: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn navigate_home(&self, reason: &str) {
        self(reason);
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// What the session tells the renderer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Sent after every handled input.
    View(ViewSnapshot),
    /// Sent when the notices on screen change.
    Notices(Vec<Notice>),
}

// ---------------------------------------------------------------------------
// Session / SessionHandle
// ---------------------------------------------------------------------------

/// Entry point for running a session.
pub struct Session;

impl Session {
    /// Validates `params`, then spawns the session task on the current
    /// tokio runtime.
    ///
    /// # Errors
    /// Returns [`CardroomError::MissingSessionParams`] after calling
    /// `navigator.navigate_home`. No connection is attempted.
    pub fn start<K, N>(
        config: ClientConfig,
        params: SessionParams,
        connector: K,
        navigator: N,
    ) -> Result<(SessionHandle, mpsc::Receiver<SessionEvent>), CardroomError>
    where
        K: Connector,
        N: Navigator,
    {
        let core = match SessionCore::new(&config, &params) {
            Ok(core) => core,
            Err(e) => {
                warn!(error = %e, "session not started");
                navigator.navigate_home(&e.to_string());
                return Err(e);
            }
        };

        let (input_tx, input_rx) = mpsc::channel(config.command_capacity.max(1));
        let (event_tx, event_rx) = mpsc::channel(config.event_capacity.max(1));
        let endpoint = config.channel_endpoint(&params.room_code, &params.player_id);
        let http = match config.action_binding {
            ActionBinding::Channel => None,
            ActionBinding::Http => Some(HttpActions::new(&config)),
        };

        let driver = Driver {
            core,
            codec: JsonCodec,
            http,
            navigator,
            events: event_tx,
            inputs: input_tx.downgrade(),
            shown: Vec::new(),
            navigated: false,
        };
        info!(
            room = %params.room_code,
            player_id = %params.player_id,
            endpoint,
            "session starting"
        );
        let task = tokio::spawn(run_session(connector, endpoint, driver, input_rx));

        let handle = SessionHandle {
            inputs: input_tx,
            task: Some(task),
        };
        Ok((handle, event_rx))
    }
}

/// Feeds player input into a running session.
///
/// Dropping the handle aborts the session task without notifying the
/// server; call [`leave`](Self::leave) first for a clean exit.
pub struct SessionHandle {
    inputs: mpsc::Sender<Input>,
    task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// # Errors
    /// Fails once the session has ended.
    pub async fn gesture(&self, gesture: Gesture) -> Result<(), CardroomError> {
        self.push(Input::Gesture(gesture)).await
    }

    /// # Errors
    /// Fails once the session has ended.
    pub async fn command(&self, command: Command) -> Result<(), CardroomError> {
        self.push(Input::Command(command)).await
    }

    /// # Errors
    /// Fails once the session has ended.
    pub async fn start_game(&self, variant: Variant) -> Result<(), CardroomError> {
        self.push(Input::StartGame(variant)).await
    }

    /// # Errors
    /// Fails once the session has ended.
    pub async fn chat(&self, message: impl Into<String>) -> Result<(), CardroomError> {
        self.push(Input::Chat(message.into())).await
    }

    /// Leaves the room. The session navigates home without waiting for
    /// the server.
    ///
    /// # Errors
    /// Fails once the session has ended.
    pub async fn leave(&self) -> Result<(), CardroomError> {
        self.push(Input::Leave).await
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Leaves, then waits up to `timeout` for the task to exit before
    /// aborting it.
    pub async fn shutdown(&mut self, timeout: Duration) {
        if self.push(Input::Leave).await.is_err() {
            debug!("session already ended");
        }
        if let Some(mut task) = self.task.take() {
            match tokio::time::timeout(timeout, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(join_err)) => {
                    warn!(error = %join_err, "session task failed");
                }
                Err(_) => {
                    warn!("session task did not exit in time; aborting");
                    task.abort();
                }
            }
        }
    }

    async fn push(&self, input: Input) -> Result<(), CardroomError> {
        self.inputs.send(input).await.map_err(|_| {
            CardroomError::from(TransportError::ConnectionClosed(
                "session ended".to_string(),
            ))
        })
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Session task
// ---------------------------------------------------------------------------

async fn run_session<K, N>(
    connector: K,
    endpoint: String,
    mut driver: Driver<N>,
    mut inputs: mpsc::Receiver<Input>,
) where
    K: Connector,
    N: Navigator,
{
    let mut link: Link<K::Connection> = Link::new();
    let opened = match link.open(&connector, &endpoint).await {
        Ok(()) => Input::Opened,
        Err(e) => Input::TransportFailed(e.to_string()),
    };
    driver.step(opened, &mut link).await;

    while !driver.navigated {
        let open = link.state() == ConnectionState::Open;
        let deadline = driver.core.next_deadline();
        let wake = tokio::time::Instant::from_std(
            deadline.unwrap_or_else(Instant::now),
        );

        let next = tokio::select! {
            frame = link.recv(), if open => Some(match frame {
                Ok(Some(bytes)) => Input::Frame(bytes),
                Ok(None) => Input::Closed,
                Err(e) => Input::TransportFailed(e.to_string()),
            }),
            input = inputs.recv() => input,
            () = tokio::time::sleep_until(wake), if deadline.is_some() => {
                Some(Input::Tick)
            }
        };

        let Some(input) = next else {
            debug!("all session handles gone");
            break;
        };
        driver.step(input, &mut link).await;
    }

    link.close().await;
    info!(room = %driver.core.room(), "session ended");
}

/// Work the driver hands off to a spawned HTTP request.
enum HttpCall {
    Action(GameAction),
    Start(Variant),
}

struct Driver<N> {
    core: SessionCore,
    codec: JsonCodec,
    /// Present when actions go over HTTP.
    http: Option<HttpActions>,
    navigator: N,
    events: mpsc::Sender<SessionEvent>,
    /// For HTTP results, which come back as inputs.
    inputs: mpsc::WeakSender<Input>,
    /// Notices the renderer last saw.
    shown: Vec<Notice>,
    navigated: bool,
}

impl<N: Navigator> Driver<N> {
    /// Handles one input and everything it leads to, then publishes.
    async fn step<C: Connection>(&mut self, input: Input, link: &mut Link<C>) {
        let mut queue = VecDeque::from([input]);
        while let Some(input) = queue.pop_front() {
            for effect in self.core.handle(input, Instant::now()) {
                if let Some(follow_up) = self.execute(effect, link).await {
                    queue.push_back(follow_up);
                }
            }
        }
        self.publish();
    }

    /// Carries out one effect. A failure comes back as the input that
    /// reports it.
    async fn execute<C: Connection>(
        &mut self,
        effect: Effect,
        link: &mut Link<C>,
    ) -> Option<Input> {
        match effect {
            Effect::Send(ClientMessage::StartGame { game_type, .. })
                if self.http.is_some() =>
            {
                self.spawn_http(HttpCall::Start(game_type));
                None
            }
            Effect::Send(message) => self.send_frame(&message, link).await,
            Effect::Dispatch(action) if self.http.is_some() => {
                self.spawn_http(HttpCall::Action(action));
                None
            }
            Effect::Dispatch(action) => {
                let message = ClientMessage::action(
                    self.core.room(),
                    self.core.local_player(),
                    action,
                );
                self.send_frame(&message, link).await
            }
            Effect::NavigateHome(reason) => {
                if !self.navigated {
                    info!(%reason, "navigating home");
                    self.navigator.navigate_home(&reason);
                    self.navigated = true;
                }
                None
            }
            Effect::Close => {
                link.close().await;
                None
            }
        }
    }

    async fn send_frame<C: Connection>(
        &mut self,
        message: &ClientMessage,
        link: &mut Link<C>,
    ) -> Option<Input> {
        let bytes = match self.codec.encode(message) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(kind = message.kind(), error = %e, "encode failed");
                return None;
            }
        };
        match link.send(&bytes).await {
            Ok(()) => {
                debug!(kind = message.kind(), "frame sent");
                None
            }
            Err(TransportError::NotOpen(state)) => {
                debug!(kind = message.kind(), %state, "frame not sent");
                Some(Input::ActionFailed("not connected".to_string()))
            }
            Err(e) => Some(Input::TransportFailed(e.to_string())),
        }
    }

    fn spawn_http(&self, call: HttpCall) {
        let Some(http) = self.http.clone() else {
            return;
        };
        let room = self.core.room().clone();
        let player = self.core.local_player().clone();
        let inputs = self.inputs.clone();

        tokio::spawn(async move {
            let result = match call {
                HttpCall::Action(action) => http.submit(&room, &player, action).await,
                HttpCall::Start(variant) => http.start(&room, variant).await,
            };
            let Err(e) = result else {
                return;
            };
            let reason = match e {
                CardroomError::ActionRejected(reason) => reason,
                other => other.to_string(),
            };
            debug!(%reason, "http submission failed");
            if let Some(tx) = inputs.upgrade() {
                if tx.send(Input::ActionFailed(reason)).await.is_err() {
                    debug!("session ended before the http result arrived");
                }
            }
        });
    }

    fn publish(&mut self) {
        self.emit(SessionEvent::View(self.core.view()));
        let notices = self.core.notices();
        if notices != self.shown {
            self.shown.clone_from(&notices);
            self.emit(SessionEvent::Notices(notices));
        }
    }

    fn emit(&self, event: SessionEvent) {
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("event channel full, dropping session event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("event receiver dropped");
            }
        }
    }
}
