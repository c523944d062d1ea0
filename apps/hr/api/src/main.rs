use axum_helpers::server::{
    CleanupCoordinator, close_postgres, create_production_app, create_router, health_router,
};
use core_config::tracing::{init_tracing, install_color_eyre};
use hr_api::{config::Config, context::AppContext, openapi::ApiDoc, seed::seed_admin};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);
    info!(app = config.app.name, version = config.app.version, "Starting");

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let context = AppContext::build(config, db);

    if let Some(seed) = &context.config.seed {
        seed_admin(seed, &context.roles, &context.employees).await?;
    }

    // create_router adds docs, /api prefix and cross-cutting layers
    let router = create_router::<ApiDoc>(context.routes())?;

    // /health: liveness with app name/version; /ready: database ping
    let app = router
        .merge(health_router(context.config.app))
        .merge(context.ready_router());

    info!("Starting HR API with graceful shutdown (30s timeout)");

    let server = context.config.server.clone();
    let db = context.db.clone();
    drop(context);

    create_production_app(app, &server, Duration::from_secs(30), async move {
        let mut cleanup = CleanupCoordinator::new();
        cleanup.add_task("postgres", async move { close_postgres(db, "main").await });
        cleanup.run().await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("HR API shutdown complete");
    Ok(())
}
