pub mod fetch_messages;
pub mod search;
pub mod send_message;
