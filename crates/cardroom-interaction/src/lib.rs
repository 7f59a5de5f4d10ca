//! Gesture resolution for Cardroom.
//!
//! Renderers report raw [`Gesture`]s (clicks, drops) and [`Command`]s
//! (buttons). The [`Resolver`] checks them against the reconciler's
//! state and either updates local selection and ordering or produces a
//! [`GameAction`](cardroom_protocol::GameAction) to send. What a drop
//! means in a given game comes from the [`ActionTable`], which holds one
//! [`VariantActions`] entry per variant.
//!
//! ```text
//! Renderer (Gesture) → Resolver → ActionTable → GameAction → Session
//! ```

mod command;
mod gesture;
mod resolver;
mod table;
pub mod variants;

pub use cardroom_state::InteractionError;
pub use command::{Command, CommandKind};
pub use gesture::{Gesture, GestureKind, Place, ZoneKind, ZoneRef};
pub use resolver::{Ignored, Resolution, Resolver};
pub use table::{ActionTable, DropContext, VariantActions};
