use crate::{
    auth::accounts::{AccountGate, UserAccountStatus},
    axum_http::{app_context::AppContext, default_routers, routers},
    config::config_model::DotEnvyConfig,
    usecases::notifications::DistributionDispatcher,
};
use anyhow::Result;
use axum::{
    Extension, Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use crates::infra::db::{
    postgres::postgres_connection::PgPoolSquad,
    repositories::{
        devices::DevicePostgres, distributions::DistributionPostgres, users::UserPostgres,
    },
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

pub fn api_routes(ctx: &AppContext) -> Router {
    let accounts: AccountGate = Arc::new(UserAccountStatus::new(Arc::new(UserPostgres::new(
        Arc::clone(&ctx.db_pool),
    ))));

    Router::new()
        .merge(routers::auth::routes(ctx))
        .merge(routers::cards::routes(ctx))
        .merge(routers::cards::integration_routes(ctx))
        .merge(routers::payments::routes(ctx))
        .merge(routers::subscriptions::routes(ctx))
        .merge(routers::donations::routes(ctx))
        .merge(routers::creators::routes(ctx))
        .merge(routers::content::routes(ctx))
        .merge(routers::social::routes(ctx))
        .merge(routers::chat::routes(ctx))
        .merge(routers::chat_ws::routes(ctx))
        .merge(routers::devices::routes(ctx))
        .merge(routers::files::routes(ctx))
        .merge(routers::admin::routes(ctx))
        .route("/health-check", get(default_routers::health_check))
        .layer(Extension(accounts))
}

fn spawn_dispatcher(ctx: &AppContext) {
    let dispatcher = Arc::new(DistributionDispatcher::new(
        Arc::new(DistributionPostgres::new(Arc::clone(&ctx.db_pool))),
        Arc::new(DevicePostgres::new(Arc::clone(&ctx.db_pool))),
        Arc::clone(&ctx.push),
    ));
    let interval = Duration::from_secs(ctx.config.dispatcher.interval_secs);
    tokio::spawn(dispatcher.run(interval));
}

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let ctx = AppContext::build(Arc::clone(&config), db_pool).await?;
    spawn_dispatcher(&ctx);

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest("/api/v1", api_routes(&ctx))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = ?err, "failed to install CTRL+C signal handler");
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
                error!(error = ?err, "failed to install SIGTERM handler");
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
