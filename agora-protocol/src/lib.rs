//! The marketplace protocol: one closed `Action` enum (`send_message`,
//! `fetch_messages`, `search`), its `Message` payload sum type, and the
//! dispatcher that runs a handler and journals the result atomically from
//! the caller's perspective.

mod action;
mod dispatcher;
mod error;
mod handlers;
mod message;

pub use action::{
    Action, FetchMessagesRequest, FetchMessagesResponse, ReceivedMessage, SearchAlgorithm,
    SearchConstraints, SearchRequest, SearchResponse, SendMessageRequest, UnknownAction,
    DEFAULT_FETCH_LIMIT,
};
pub use dispatcher::{action_protocols, execute_action};
pub use error::{DispatchError, DispatchResult};
pub use message::{Message, OrderItem, OrderProposal, Payment, TextMessage};
