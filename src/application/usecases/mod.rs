pub mod ai_analyses;
pub mod documents;
pub mod properties;
pub mod rtlo_questions;
pub mod sessions;
pub mod subscriptions;
pub mod users;
