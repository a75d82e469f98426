pub mod axum_http;
pub mod openai;
pub mod postgres;
pub mod stripe;
