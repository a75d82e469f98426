use super::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub stage: Stage,
    pub server: Server,
    pub database: Database,
    pub auth: Auth,
    pub openai: OpenAi,
    /// `None` when billing is not configured. Only allowed outside production.
    pub stripe: Option<Stripe>,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
    pub allowed_origin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct Auth {
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub cookie_name: String,
}

#[derive(Debug, Clone)]
pub struct OpenAi {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Stripe {
    pub secret_key: String,
    pub price_id: String,
    pub webhook_secret: String,
    pub base_url: String,
}
