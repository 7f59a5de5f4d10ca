//! Non-drag intents, such as buttons and key presses.

/// An intent that isn't a drag: draw, knock, call snap and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Draw { from_discard: bool },
    Knock,
    EndTurn,
    Challenge,
    Snap,
    Bid(u32),
    GrabSpoon,
}

/// [`Command`] without its data, used as a table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Draw,
    Knock,
    EndTurn,
    Challenge,
    Snap,
    Bid,
    GrabSpoon,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Draw { .. } => CommandKind::Draw,
            Self::Knock => CommandKind::Knock,
            Self::EndTurn => CommandKind::EndTurn,
            Self::Challenge => CommandKind::Challenge,
            Self::Snap => CommandKind::Snap,
            Self::Bid(_) => CommandKind::Bid,
            Self::GrabSpoon => CommandKind::GrabSpoon,
        }
    }
}

impl CommandKind {
    /// Races any player may join at any time. Everything else waits for
    /// the local player's turn.
    pub fn allowed_off_turn(self) -> bool {
        matches!(self, Self::Snap | Self::Challenge | Self::GrabSpoon)
    }
}
