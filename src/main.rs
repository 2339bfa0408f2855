use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use practical_grader::{config, handlers, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "practical_grader=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let settings = config::load_settings();
  if !settings.legacy_inference {
    tracing::info!("Named-pair inference disabled; undeclared pair answers grade as single values");
  }

  let app = handlers::router(AppState::from_settings(&settings));

  let bind_addr = settings.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://{}", bind_addr);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
