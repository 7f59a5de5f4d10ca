//! Core value types shared by every layer of the client.
//!
//! These are the identifiers and card values that appear inside frames.
//! Anything normalized here (player ids, face-down cards, status names)
//! is normalized exactly once, at decode time, so no consumer has to
//! second-guess the shape again.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player identifier in its single canonical form: a trimmed string.
///
/// The server sends ids both as JSON numbers (`"player_id": 3`) and as
/// strings (`"current_player": "3"`, map keys). Comparing a number with a
/// string is the classic way to get "is it my turn?" wrong, so the custom
/// `Deserialize` impl below accepts either and always produces the string
/// form. `3` and `"3"` decode to the same `PlayerId`.
///
/// Serializes as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a `PlayerId`, trimming surrounding whitespace.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_string())
    }

    /// Returns the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty id (never valid for a session).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<u64> for PlayerId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        struct PlayerIdVisitor;

        impl Visitor<'_> for PlayerIdVisitor {
            type Value = PlayerId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a player id as a string or an integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PlayerId, E> {
                Ok(PlayerId::new(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<PlayerId, E> {
                Ok(PlayerId::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<PlayerId, E> {
                Ok(PlayerId(v.to_string()))
            }
        }

        deserializer.deserialize_any(PlayerIdVisitor)
    }
}

/// The short code that names a room, e.g. `"ABC123"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Creates a `RoomCode`, trimming surrounding whitespace.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// A card suit. Serialized lowercase (`"hearts"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hearts => "hearts",
            Self::Diamonds => "diamonds",
            Self::Clubs => "clubs",
            Self::Spades => "spades",
        }
    }
}

/// A card rank, serialized the way the server writes it: `"A"`, `"2"` …
/// `"10"`, `"J"`, `"Q"`, `"K"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

impl Rank {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ace => "A",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
        }
    }
}

/// One card as the client sees it: either a face or the face-down marker.
///
/// On the wire a card is `{ "suit": "hearts", "rank": "A" }`, optionally
/// with `"show_back": true`. A card marked `show_back`, or missing its
/// suit or rank, is [`Card::Back`]: whatever suit/rank it carries is
/// ignored. Extra keys such as `image_front` are ignored.
///
/// Cards are values: they are never mutated, only replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "WireCard", into = "WireCard")]
pub enum Card {
    Face { suit: Suit, rank: Rank },
    Back,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self::Face { suit, rank }
    }

    pub fn is_face_up(&self) -> bool {
        matches!(self, Self::Face { .. })
    }

    pub fn rank(&self) -> Option<Rank> {
        match self {
            Self::Face { rank, .. } => Some(*rank),
            Self::Back => None,
        }
    }

    /// Canonical key ignoring duplicates: `"hearts_A"`, or `"back"`.
    pub fn key(&self) -> String {
        match self {
            Self::Face { suit, rank } => {
                format!("{}_{}", suit.as_str(), rank.as_str())
            }
            Self::Back => "back".to_string(),
        }
    }
}

/// The permissive wire shape a [`Card`] is decoded from.
#[derive(Serialize, Deserialize)]
struct WireCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suit: Option<Suit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rank: Option<Rank>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    show_back: bool,
}

impl From<WireCard> for Card {
    fn from(wire: WireCard) -> Self {
        match (wire.show_back, wire.suit, wire.rank) {
            (false, Some(suit), Some(rank)) => Card::Face { suit, rank },
            _ => Card::Back,
        }
    }
}

impl From<Card> for WireCard {
    fn from(card: Card) -> Self {
        match card {
            Card::Face { suit, rank } => WireCard {
                suit: Some(suit),
                rank: Some(rank),
                show_back: false,
            },
            Card::Back => WireCard {
                suit: None,
                rank: None,
                show_back: true,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// One card game ruleset sharing the session and protocol.
///
/// Serialized as the server's `game_type` strings (`"kings_corner"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Snap,
    GoFish,
    Rummy,
    Spades,
    Scat,
    Bluff,
    KingsCorner,
    Spoons,
}

impl Variant {
    /// Every variant, in a stable order.
    pub const ALL: [Variant; 8] = [
        Self::Snap,
        Self::GoFish,
        Self::Rummy,
        Self::Spades,
        Self::Scat,
        Self::Bluff,
        Self::KingsCorner,
        Self::Spoons,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Snap => "snap",
            Self::GoFish => "go_fish",
            Self::Rummy => "rummy",
            Self::Spades => "spades",
            Self::Scat => "scat",
            Self::Bluff => "bluff",
            Self::KingsCorner => "kings_corner",
            Self::Spoons => "spoons",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| format!("unknown game variant {s:?}"))
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Coarse game lifecycle.
///
/// The server reports finer-grained names in the `state` key; they fold
/// into three buckets:
///
/// | wire                        | status   |
/// |-----------------------------|----------|
/// | `waiting`, `starting`       | `Lobby`  |
/// | `playing`, `round_end`      | `Active` |
/// | `game_end`                  | `Over`   |
///
/// The canonical names (`lobby`, `active`, `over`) are accepted too.
/// Anything else decodes as `Lobby`, with a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    Lobby,
    Active,
    Over,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lobby => "lobby",
            Self::Active => "active",
            Self::Over => "over",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.trim() {
            "playing" | "round_end" | "active" => Self::Active,
            "game_end" | "over" => Self::Over,
            "waiting" | "starting" | "lobby" => Self::Lobby,
            other => {
                warn!(status = other, "unknown game status, treating as lobby");
                Self::Lobby
            }
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

// =========================================================================
// Tests
// =========================================================================
