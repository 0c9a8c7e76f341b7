//! Typed request payloads, their field specs, and the small domain rules
//! that go with them.

pub mod asset;
pub mod assistant;
pub mod contact;
pub mod mood;
pub mod note;
pub mod project;
pub mod task;
pub mod user;
