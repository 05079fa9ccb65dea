//! Generic trigger-based routing: match a dispatch key against an ordered
//! list of patterns and run the first handler that matches.

pub mod handler;
pub mod pattern;
pub mod responder;
pub mod trigger_router;

pub use handler::{BotContext, Handler, HandlerResult, Invocation, SharedHandler, handler_fn};
pub use pattern::{Captures, IntoPattern, Pattern};
pub use responder::Responder;
pub use trigger_router::{Chosen, DEFAULT_USER_ERROR_MESSAGE, Trigger, TriggerRouter};
