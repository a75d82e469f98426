use anyhow::{Context, Result, bail};

use super::{
    config_model::{Auth, Database, DotEnvyConfig, OpenAi, Server, Stripe},
    stage::Stage,
};

const DEFAULT_OPENAI_MODEL: &str = "gpt-5";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_STRIPE_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;
const DEFAULT_SESSION_COOKIE_NAME: &str = "sid";
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let stage = get_stage()?;

    let server = Server {
        port: required("SERVER_PORT")?
            .parse()
            .context("SERVER_PORT is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
        allowed_origin: optional("ALLOWED_ORIGIN"),
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: match optional("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().context("DATABASE_MAX_CONNECTIONS is invalid")?,
            None => DEFAULT_DATABASE_MAX_CONNECTIONS,
        },
    };

    let auth = Auth {
        jwt_secret: required("AUTH_JWT_SECRET")?,
        session_ttl_hours: match optional("SESSION_TTL_HOURS") {
            Some(raw) => raw.parse().context("SESSION_TTL_HOURS is invalid")?,
            None => DEFAULT_SESSION_TTL_HOURS,
        },
        cookie_name: optional("SESSION_COOKIE_NAME")
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE_NAME.to_string()),
    };

    let openai = OpenAi {
        api_key: required("OPENAI_API_KEY")?,
        model: optional("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        base_url: optional("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
    };

    let stripe = match optional("STRIPE_SECRET_KEY") {
        Some(secret_key) => Some(Stripe {
            secret_key,
            price_id: required("STRIPE_PRICE_ID")?,
            webhook_secret: required("STRIPE_WEBHOOK_SECRET")?,
            base_url: optional("STRIPE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_STRIPE_BASE_URL.to_string()),
        }),
        None => None,
    };
    let stripe = resolve_stripe(stage, stripe)?;

    Ok(DotEnvyConfig {
        stage,
        server,
        database,
        auth,
        openai,
        stripe,
    })
}

pub fn get_stage() -> Result<Stage> {
    dotenvy::dotenv().ok();

    parse_stage(std::env::var("STAGE").ok().as_deref())
}

/// An absent or blank `STAGE` is local; any other value must name a known stage.
pub fn parse_stage(raw: Option<&str>) -> Result<Stage> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(Stage::default()),
        Some(value) => {
            Stage::try_from(value).with_context(|| format!("STAGE is invalid: {value}"))
        }
    }
}

/// Billing may be absent outside production; a production deployment must not
/// start without it.
pub fn resolve_stripe(stage: Stage, stripe: Option<Stripe>) -> Result<Option<Stripe>> {
    if stripe.is_none() && stage.is_production() {
        bail!("Missing required Stripe secret: STRIPE_SECRET_KEY");
    }
    Ok(stripe)
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} is invalid"))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
