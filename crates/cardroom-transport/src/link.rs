//! The session's link: one connection plus its lifecycle state.

use crate::{Connection, ConnectionState, Connector, TransportError};

/// Owns the single connection of a session and its [`ConnectionState`].
///
/// Sends are refused with [`TransportError::NotOpen`] unless the link is
/// open. Nothing is buffered across a disconnect and nothing is retried.
pub struct Link<C: Connection> {
    conn: Option<C>,
    state: ConnectionState,
}

impl<C: Connection> Link<C> {
    /// Creates a link in the `Connecting` state with no connection yet.
    pub fn new() -> Self {
        Self {
            conn: None,
            state: ConnectionState::Connecting,
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Connects through `connector`. On success the link is `Open`.
    pub async fn open<K>(
        &mut self,
        connector: &K,
        endpoint: &str,
    ) -> Result<(), TransportError>
    where
        K: Connector<Connection = C>,
    {
        self.state = ConnectionState::Connecting;
        match connector.connect(endpoint).await {
            Ok(conn) => {
                tracing::info!(id = %conn.id(), endpoint, "link open");
                self.conn = Some(conn);
                self.state = ConnectionState::Open;
                Ok(())
            }
            Err(e) => {
                tracing::error!(endpoint, error = %e, "link failed to open");
                self.state = ConnectionState::Errored;
                Err(e)
            }
        }
    }

    /// Sends one frame. A failed send marks the link `Errored`.
    pub async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let conn = self.open_conn()?;
        match conn.send(data).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "send failed");
                self.state = ConnectionState::Errored;
                Err(e)
            }
        }
    }

    /// Receives the next frame.
    ///
    /// `Ok(None)` means the server closed the channel; the link is then
    /// `Closed`. A receive fault marks it `Errored`.
    pub async fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let conn = self.open_conn()?;
        match conn.recv().await {
            Ok(Some(frame)) => Ok(Some(frame)),
            Ok(None) => {
                tracing::info!("link closed by peer");
                self.state = ConnectionState::Closed;
                Ok(None)
            }
            Err(e) => {
                tracing::error!(error = %e, "receive failed");
                self.state = ConnectionState::Errored;
                Err(e)
            }
        }
    }

    /// Closes the underlying connection, best effort.
    pub async fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = conn.close().await {
                tracing::debug!(error = %e, "close failed");
            }
        }
        if !self.state.is_terminal() {
            self.state = ConnectionState::Closed;
        }
    }

    fn open_conn(&self) -> Result<&C, TransportError> {
        match (&self.conn, self.state) {
            (Some(conn), ConnectionState::Open) => Ok(conn),
            (_, state) => Err(TransportError::NotOpen(state)),
        }
    }
}

impl<C: Connection> Default for Link<C> {
    fn default() -> Self {
        Self::new()
    }
}
