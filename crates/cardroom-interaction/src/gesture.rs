//! Raw input from the renderer: clicks and drops on cards and zones.

use std::fmt;
use std::str::FromStr;

/// The kind of board area a card can be dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneKind {
    Foundation,
    Corner,
    Meld,
    Discard,
    Center,
    /// Another player's seat.
    Player,
}

impl ZoneKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Corner => "corner",
            Self::Meld => "meld",
            Self::Discard => "discard",
            Self::Center => "center",
            Self::Player => "player",
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foundation" => Ok(Self::Foundation),
            "corner" => Ok(Self::Corner),
            "meld" => Ok(Self::Meld),
            "discard" => Ok(Self::Discard),
            "center" => Ok(Self::Center),
            "player" => Ok(Self::Player),
            other => Err(format!("unknown zone kind: {other}")),
        }
    }
}

/// One specific zone: its kind plus whatever names it on the board.
///
/// `id` is the pile id (`"corner_2"`), meld index (`"0"`) or player id,
/// depending on the kind. Zones that are unique on their board (a single
/// discard pile, the center) carry none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneRef {
    pub kind: ZoneKind,
    pub id: Option<String>,
}

impl ZoneRef {
    pub fn new(kind: ZoneKind) -> Self {
        Self { kind, id: None }
    }

    pub fn with_id(kind: ZoneKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: Some(id.into()),
        }
    }
}

/// Where a gesture starts or ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Place {
    /// A card in the local hand, by display position.
    Hand(usize),
    Zone(ZoneRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Click,
    Drop,
}

/// A single pointer gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gesture {
    pub kind: GestureKind,
    pub source: Place,
    /// Where a drop landed. Unused for clicks.
    pub target: Option<Place>,
}

impl Gesture {
    pub fn click(place: Place) -> Self {
        Self {
            kind: GestureKind::Click,
            source: place,
            target: None,
        }
    }

    pub fn drop(source: Place, target: Place) -> Self {
        Self {
            kind: GestureKind::Drop,
            source,
            target: Some(target),
        }
    }

    /// Whether resolving this gesture can produce an action for the
    /// server. Only drops onto a board zone can.
    pub fn may_dispatch(&self) -> bool {
        self.kind == GestureKind::Drop && matches!(self.target, Some(Place::Zone(_)))
    }
}
