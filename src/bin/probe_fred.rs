use chrono::NaiveDate;
use log::{error, info};

use buffett_observatory::services::fred::{FredClient, Frequency};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    // usage: probe_fred [SERIES_ID] [d|m|q]
    let series_id = std::env::args().nth(1).unwrap_or_else(|| "GDP".to_string());
    let frequency = match std::env::args().nth(2) {
        Some(arg) => Frequency::from_param(&arg)
            .ok_or_else(|| format!("unknown frequency {:?}, expected d, m or q", arg))?,
        None => Frequency::Quarterly,
    };
    info!("Probing FRED series {} ({:?})...", series_id, frequency);

    let fred = FredClient::from_env(reqwest::Client::new())?;
    let start = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();

    let observations = fred.try_fetch_series(&series_id, start, frequency).await?;

    if observations.is_empty() {
        error!("No valid observations returned for {}", series_id);
    } else {
        info!("Fetched {} observations", observations.len());
        for obs in observations.iter().rev().take(8) {
            println!("{}  {}", obs.date, obs.value);
        }
        let latest = fred.latest_value(&series_id, start, frequency).await?;
        println!("latest: {} = {}", latest.date, latest.value);
    }

    Ok(())
}
