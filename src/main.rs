use inkpot::{app, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "inkpot=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr()?;
    let app_env = config.app_env.clone();
    tracing::info!(
        %addr,
        app_env = %app_env,
        user_delete_policy = %config.user_delete_policy,
        "starting"
    );

    let state = AppState::init(config).await?;
    let app = app::build_app(state);

    app::serve(app, addr, &app_env).await
}
