use crate::{
    application::usecases::sessions::SessionUseCase,
    config::config_model::DotEnvyConfig,
    infrastructure::{
        axum_http::{
            auth::{self, SessionCookie, SessionGate},
            default_routers, routers,
        },
        openai::openai_client::OpenAiClient,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{sessions::SessionPostgres, users::UserPostgres},
        },
        stripe::stripe_client::StripeClient,
    },
};
use anyhow::Result;
use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{CONTENT_TYPE, COOKIE},
    },
    middleware,
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

type Sessions = SessionUseCase<SessionPostgres, UserPostgres>;

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let session_usecase = Arc::new(SessionUseCase::new(
        Arc::new(SessionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        chrono::Duration::hours(config.auth.session_ttl_hours),
    ));
    let session_gate = SessionGate::new(
        Arc::clone(&session_usecase),
        SessionCookie::from_config(&config),
        &config.auth.jwt_secret,
    );

    let text_generator = Arc::new(OpenAiClient::from_config(&config.openai));
    let billing = config
        .stripe
        .as_ref()
        .map(|stripe| Arc::new(StripeClient::from_config(stripe)));
    if billing.is_none() {
        warn!("Stripe is not configured; subscription endpoints will answer 503");
    }

    let protected = Router::new()
        .merge(routers::users::routes(Arc::clone(&db_pool)))
        .merge(routers::properties::routes(Arc::clone(&db_pool)))
        .merge(routers::rtlo_questions::routes(
            Arc::clone(&db_pool),
            Arc::clone(&text_generator),
        ))
        .merge(routers::documents::routes(
            Arc::clone(&db_pool),
            Arc::clone(&text_generator),
        ))
        .merge(routers::ai_analyses::routes(
            Arc::clone(&db_pool),
            Arc::clone(&text_generator),
        ))
        .merge(routers::subscriptions::routes(
            Arc::clone(&db_pool),
            billing.clone(),
        ))
        .route_layer(middleware::from_fn_with_state(
            session_gate.clone(),
            auth::require_session::<SessionPostgres, UserPostgres>,
        ));

    let public = Router::new()
        .merge(routers::auth::routes(session_gate))
        .merge(routers::properties::public_routes(Arc::clone(&db_pool)))
        .merge(routers::legal_aid::routes())
        .merge(routers::subscriptions::webhook_routes(
            Arc::clone(&db_pool),
            billing,
        ))
        .route("/health-check", get(default_routers::health_check));

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest("/api", public.merge(protected))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http());

    tokio::spawn(sweep_expired_sessions(session_usecase));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Credentialed CORS needs an explicit origin; without one any origin is allowed
/// but cookies will not be sent cross-site.
fn cors_layer(config: &DotEnvyConfig) -> Result<CorsLayer> {
    let cors = CorsLayer::new().allow_methods([
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::PUT,
        Method::DELETE,
    ]);

    Ok(match config.server.allowed_origin.as_deref() {
        Some(origin) => cors
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_headers([CONTENT_TYPE, COOKIE])
            .allow_credentials(true),
        None => cors.allow_headers([CONTENT_TYPE]).allow_origin(Any),
    })
}

async fn sweep_expired_sessions(sessions: Arc<Sessions>) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        if let Err(err) = sessions.purge_expired().await {
            error!(error = ?err, "sessions: expired session sweep failed");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
