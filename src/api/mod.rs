//! Webhook handling: classify Slack payloads and route them to triggers.

pub mod ack;
pub mod category;
pub mod dispatcher;
pub mod event_handler;
pub mod external_data_handler;
pub mod handler;
pub mod helpers;
pub mod interactive_handler;
pub mod parsing;
pub mod slash_handler;
pub mod unescape;

pub use category::{Category, InteractiveKind};
pub use dispatcher::InteractionDispatcher;
pub use event_handler::{HANDSHAKE_KEY, echo_challenge};
pub use handler::{Endpoint, InboundRequest};
