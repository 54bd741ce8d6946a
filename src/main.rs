use env_logger;
use log::{info, warn};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use buffett_observatory::routes;
use buffett_observatory::services::filings::CikStore;
use buffett_observatory::services::fred::FredClient;
use buffett_observatory::AppState;

const DEFAULT_SEC_USER_AGENT: &str = "buffett-observatory (contact: dev@example.com)";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let port_str = env::var("PORT").unwrap_or_else(|_| {
        warn!("$PORT not set, defaulting to 3030");
        "3030".to_string()
    });

    let port: u16 = port_str.parse().expect("PORT must be a number");
    info!("Using PORT: {}", port);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!("Will bind to: {}", addr);

    let http = reqwest::Client::new();

    let fred = match FredClient::from_env(http.clone()) {
        Ok(client) => client,
        Err(e) => {
            warn!("{}; FRED-backed endpoints will return empty data", e);
            FredClient::new(http.clone(), String::new())
        }
    };

    let sec_user_agent = env::var("SEC_USER_AGENT").unwrap_or_else(|_| {
        warn!("$SEC_USER_AGENT not set, using the default contact string");
        DEFAULT_SEC_USER_AGENT.to_string()
    });

    let state = Arc::new(AppState {
        fred,
        filings: CikStore::new(http.clone(), sec_user_agent),
        http,
    });

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    // Set up routes
    let api = routes::routes(state).with(cors);
    info!("Routes configured successfully with CORS.");

    // Start the server
    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
}
