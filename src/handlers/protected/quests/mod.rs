pub mod collection;
pub mod objectives;
pub mod record;

// Re-export handler functions for use in routing
pub use collection::get as quests_get;
pub use collection::post as quests_post;

pub use record::get as quest_get;
pub use record::delete as quest_delete;

pub use objectives::put as objectives_put;
