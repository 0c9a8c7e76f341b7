pub use super::assets::Entity as Assets;
pub use super::contacts::Entity as Contacts;
pub use super::mood_entries::Entity as MoodEntries;
pub use super::notes::Entity as Notes;
pub use super::projects::Entity as Projects;
pub use super::tasks::Entity as Tasks;
pub use super::users::Entity as Users;
