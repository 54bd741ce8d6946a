use log::info;

use buffett_observatory::services::quotes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let symbols: Vec<String> = std::env::args().skip(1).collect();
    let symbols = if symbols.is_empty() {
        vec!["AAPL".to_string(), "MSFT".to_string(), "^GSPC".to_string()]
    } else {
        symbols
    };

    info!("Probing quotes for {:?}", symbols);
    let http = reqwest::Client::new();
    let batch = quotes::fetch_quotes(&http, &symbols).await;

    for quote in &batch.quotes {
        println!(
            "{}  {}  ({}%)",
            quote.symbol,
            quote.price,
            quote.change_percent.unwrap_or(0.0)
        );
    }
    for failure in &batch.failed {
        println!("{}  FAILED: {}", failure.symbol, failure.reason);
    }

    Ok(())
}
