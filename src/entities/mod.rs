pub mod prelude;

pub mod assets;
pub mod contacts;
pub mod mood_entries;
pub mod notes;
pub mod projects;
pub mod tasks;
pub mod types;
pub mod users;
