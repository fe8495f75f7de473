use anyhow::Context;
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

use recipeshop_rs::{
    create_recipe_app, create_shop_app, init_observability,
    repositories::{
        InMemoryCartRepository, InMemoryRecipeRepository, InMemoryUserRepository,
        StaticProductRepository,
    },
    services::{PlaintextCredentials, RecipeService, ShopService, TheMealDbClient},
    shutdown_observability, Config, Metrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_environment().context("Failed to load configuration")?;

    init_observability(
        &config.observability.service_name,
        &config.observability.service_version,
        config.observability.otlp_endpoint.as_deref(),
        &config.observability.log_level,
        config.observability.enable_json_logging,
    )?;

    info!(
        "Starting {} v{}",
        config.observability.service_name, config.observability.service_version
    );

    let metrics = Arc::new(Metrics::new()?);

    let recipe_service = Arc::new(RecipeService::new(Arc::new(
        InMemoryRecipeRepository::seeded(),
    )));
    let meal_search = Arc::new(
        TheMealDbClient::new(&config.meal_search.meal_search_base_url)
            .context("Failed to build meal search client")?,
    );
    info!("Online recipe search at {}", meal_search.search_url());

    let shop_service = Arc::new(ShopService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryCartRepository::new()),
        Arc::new(StaticProductRepository::seeded()),
        Arc::new(PlaintextCredentials),
    ));

    let recipe_app = create_recipe_app(
        metrics.clone(),
        recipe_service,
        meal_search,
        &config.server,
    );
    let shop_app = create_shop_app(metrics, shop_service, &config.server);

    let recipe_addr = config.server.recipe_addr()?;
    let shop_addr = config.server.shop_addr()?;

    let recipe_listener = TcpListener::bind(recipe_addr)
        .await
        .with_context(|| format!("Failed to bind recipe service to {}", recipe_addr))?;
    let shop_listener = TcpListener::bind(shop_addr)
        .await
        .with_context(|| format!("Failed to bind shop service to {}", shop_addr))?;

    info!("Recipe service listening on {}", recipe_addr);
    info!("Shop service listening on {}", shop_addr);

    // One Ctrl-C stops both servers
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            // Keep serving; the sender must stay alive or the servers would stop
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let result = tokio::try_join!(
        axum::serve(recipe_listener, recipe_app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()))
            .into_future(),
        axum::serve(shop_listener, shop_app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
            .into_future(),
    );

    shutdown_observability().await;
    result?;

    info!("Server shutdown complete");
    Ok(())
}

async fn wait_for_shutdown(mut shutdown_rx: watch::Receiver<bool>) {
    // A dropped sender also means shut down
    let _ = shutdown_rx.wait_for(|stopped| *stopped).await;
}
