//! Backend-agnostic storage contract: three append-only controllers
//! (participants, actions, logs), a uniform CRUD surface, and a normalized
//! error taxonomy. Concrete backends live in `agora-storage-sqlite` and
//! `agora-storage-postgres`.

mod backend;
mod controller;
mod error;
mod rows;

pub use backend::StorageBackend;
pub use controller::{ActionController, LogController, ParticipantController};
pub use error::{StorageError, StorageResult};
pub use rows::{
    ActionUpdate, LogUpdate, NewAction, NewLog, NewParticipant, ParticipantUpdate,
};
