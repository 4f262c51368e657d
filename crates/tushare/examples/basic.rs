//! Calls a few reference-data shortcuts and prints the first rows of each.
//!
//! ```sh
//! TUSHARE_TOKEN=... cargo run -p tushare --example basic
//! ```

use tushare::{Endpoint, EndpointApi, Params, Table, TushareClient, common_fields};

fn print_head(title: &str, result: tushare::Result<Table>, limit: usize) {
    println!("=== {title} ===");
    match result {
        Ok(table) if table.is_empty() => println!("no rows"),
        Ok(table) => {
            let rows = table.rows().iter().take(limit).cloned().collect();
            let head = Table::new(table.columns().to_vec(), rows);
            match head.to_csv() {
                Ok(csv) => print!("{csv}"),
                Err(e) => eprintln!("{e}"),
            }
        }
        Err(e) => eprintln!("request failed: {e}"),
    }
}

#[tokio::main]
async fn main() -> tushare::Result<()> {
    let client = TushareClient::from_env()?;

    print_head("trade days", client.trade_days("20240101", "20240131").await, 5);
    print_head("name history", client.name_history("000001.SZ").await, 5);
    print_head("SH connect constituents", client.hs_constituents("SH", true).await, 5);
    print_head("company profile", client.company_info("000001.SZ").await, 1);
    print_head("recent IPOs", client.new_shares("", "").await, 5);

    let fields = common_fields(Endpoint::StockBasic);
    print_head(
        "listed stocks",
        client
            .call(
                Endpoint::StockBasic,
                Params::new().with("exchange", "SZSE"),
                &fields,
            )
            .await,
        5,
    );

    Ok(())
}
