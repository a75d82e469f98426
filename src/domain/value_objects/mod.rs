pub mod ai_analyses;
pub mod documents;
pub mod enums;
pub mod iam;
pub mod legal_aid;
pub mod properties;
pub mod rtlo_questions;
pub mod subscriptions;
pub mod users;
