use std::{future::IntoFuture, process, sync::Arc};

use folio::{
    application::{
        auth::{AuthService, TokenConfig},
        error::AppError,
        upstream::{
            FeedCache, SystemClock, build_http_client,
            letterboxd::{self, LetterboxdService},
            rawg::{self, RawgService},
        },
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        telemetry,
        uploads::UploadStorage,
    },
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::CreateAdmin(args) => run_create_admin(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let jwt_secret = settings
        .auth
        .jwt_secret()
        .map_err(|err| AppError::from(InfraError::configuration(err.to_string())))?
        .to_string();
    let repositories = init_repositories(&settings).await?;

    let state = build_api_state(repositories, &settings, jwt_secret)?;
    serve_http(&settings, state).await
}

async fn run_create_admin(
    settings: config::Settings,
    args: config::CreateAdminArgs,
) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    // Tokens are never issued here, so the signing key is irrelevant.
    let tokens = TokenConfig::new(Vec::new(), time::Duration::ZERO);
    let auth = AuthService::new(repositories, tokens);
    let user = auth.create_admin(&args.username, &args.password).await?;

    info!(
        target = "folio::cli",
        user_id = user.id,
        username = %user.username,
        "admin user created"
    );
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_api_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
    jwt_secret: String,
) -> Result<ApiState, AppError> {
    let token_ttl = time::Duration::try_from(settings.auth.token_ttl)
        .map_err(|err| AppError::validation(format!("token ttl out of range: {err}")))?;
    let tokens = TokenConfig::new(jwt_secret, token_ttl);

    let client = build_http_client(settings.upstream.timeout)
        .map_err(|err| AppError::from(InfraError::configuration(err.to_string())))?;
    let clock = Arc::new(SystemClock);
    let cache_ttl = settings.upstream.cache_ttl;

    let letterboxd = Arc::new(LetterboxdService::new(
        client.clone(),
        settings.letterboxd.feed_url.as_str(),
        Arc::new(FeedCache::new(letterboxd::FEED_NAME, cache_ttl, clock.clone())),
    ));
    if settings.rawg.api_key.is_none() {
        warn!(
            target = "folio::upstream",
            "rawg api key is not configured; game lookups will be unavailable"
        );
    }
    let rawg = Arc::new(RawgService::new(
        client,
        settings.rawg.base_url.clone(),
        settings.rawg.api_key.clone(),
        repositories.clone(),
        Arc::new(FeedCache::new(rawg::FEED_NAME, cache_ttl, clock)),
    ));

    let upload_storage = UploadStorage::new(
        settings.uploads.directory.clone(),
        settings.uploads.max_request_bytes.get(),
    )
    .map_err(|err| AppError::from(InfraError::from(err)))?;

    Ok(ApiState::new(
        repositories,
        tokens,
        Arc::new(upload_storage),
        letterboxd,
        rawg,
    ))
}

async fn serve_http(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let body_limit = usize::try_from(settings.uploads.max_request_bytes.get()).unwrap_or(usize::MAX);
    let router = http::build_router(state, &settings.cors, body_limit);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(target = "folio::http", addr = %settings.server.addr, "listening");

    let shutdown = Arc::new(Notify::new());
    let signalled = shutdown.clone();
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            wait_for_signal().await;
            info!(target = "folio::http", "shutdown signal received");
            signalled.notify_one();
        })
        .into_future();

    let grace = settings.server.graceful_shutdown;
    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = async {
            shutdown.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                target = "folio::http",
                grace_seconds = grace.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
        }
    }

    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target = "folio::http", error = %err, "failed to listen for ctrl-c");
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
                error!(target = "folio::http", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
