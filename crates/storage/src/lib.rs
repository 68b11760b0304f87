#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    AccountRecord, AccountRepository, InMemoryRepository, NewAccount, ScoreRepository, Storage,
    StorageError,
};
