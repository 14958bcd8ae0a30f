use anyhow::Context;
use clap::Parser;
use serde_json::json;

/// 對執行中的服務送出一次 `/predict` 請求
#[derive(Parser)]
#[command(name = "predict-client")]
#[command(about = "Send a single prediction request to a running commodity-forecast server")]
struct Args {
    /// Base URL of the server
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    url: String,

    #[arg(long)]
    commodity: String,

    /// Region column name (sent as `state`)
    #[arg(long)]
    state: String,

    /// Target date, YYYY-MM-DD
    #[arg(long)]
    date: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let endpoint = format!("{}/predict", args.url.trim_end_matches('/'));
    let payload = json!({
        "commodity": args.commodity,
        "state": args.state,
        "date": args.date,
    });

    tracing::debug!("POST {} {}", endpoint, payload);

    let response = reqwest::Client::new()
        .post(&endpoint)
        .json(&payload)
        .send()
        .await
        .with_context(|| format!("request to {} failed", endpoint))?;

    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .context("server returned a non-JSON body")?;

    if status.is_success() {
        println!("✅ {} {}", status.as_u16(), body);
    } else {
        println!("❌ {} {}", status.as_u16(), body);
        std::process::exit(1);
    }

    Ok(())
}
