pub mod models;
pub mod repository;
pub mod store;

pub use models::quest::Quest;
pub use repository::QuestRepository;
pub use store::{Datastore, StoreError};
