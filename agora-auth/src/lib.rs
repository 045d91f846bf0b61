//! Identity allocation and bearer-token authentication: a per-base id
//! allocator and a token service sitting directly on top of
//! [`agora_storage::ParticipantController`], with no JWT or session layer.

mod allocator;
mod error;
mod token;

pub use allocator::IdAllocator;
pub use error::{AuthError, AuthResult};
pub use token::TokenService;
