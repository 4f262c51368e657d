//! Fetches raw and forward-adjusted daily bars for one security.
//!
//! ```sh
//! TUSHARE_TOKEN=... cargo run -p tushare --example bar
//! ```

use tushare::{AdjustMode, BarClient, BarRequest, Factor, Params, QueryExecutor, TushareClient};

#[tokio::main]
async fn main() -> tushare::Result<()> {
    let client = TushareClient::from_env()?;

    println!("=== daily bars ===");
    let params = Params::new()
        .with("ts_code", "000001.SZ")
        .with("start_date", "20220101")
        .with("end_date", "20220110");
    let daily = client.query("daily", params, &[]).await?;
    println!("{}", daily.to_json_pretty()?);

    println!("=== forward-adjusted bars with MA(5) and volume ratio ===");
    let bars = BarClient::new(client);
    let request = BarRequest::new("000001.SZ")
        .start_date("20220101")
        .end_date("20220131")
        .adjust(AdjustMode::Forward)
        .factor(Factor::VolumeRatio)
        .ma([5]);
    let adjusted = bars.bar(&request).await?;
    print!("{}", adjusted.to_csv()?);

    Ok(())
}
