use clap::Parser;
use serde_json::Value;

use repo_bridge::ClientRequest;

#[derive(Parser)]
#[command(name = "bridge-cli")]
#[command(about = "Send a single request through the repository bridge ingress", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8092")]
    url: String,

    #[arg(short, long, default_value = "repository.http")]
    address: String,

    /// Repository path, e.g. /content/page.html
    #[arg(short, long)]
    path: String,

    /// Query parameter as key=value (repeatable, order kept)
    #[arg(long = "param", value_parser = parse_pair)]
    params: Vec<(String, String)>,

    /// Request header as Name=value (repeatable)
    #[arg(long = "header", value_parser = parse_pair)]
    headers: Vec<(String, String)>,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut request = ClientRequest::new(cli.path);
    for (key, value) in cli.params {
        request = request.with_param(key, value);
    }
    for (name, value) in cli.headers {
        request = request.with_header(name, value);
    }

    let res = reqwest::Client::new()
        .post(format!("{}/eventbus/{}", cli.url, cli.address))
        .json(&request)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: ingress returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
