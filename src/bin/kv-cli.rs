use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "kv-cli")]
#[command(about = "Command-line client for the key/value server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is alive
    Hello,
    /// Ask the server to greet someone
    Name { name: String },
    /// Store a value under a key that is not yet taken
    Add { key: String, value: String },
    /// Fetch the value stored under a key
    Get { key: String },
}

impl Commands {
    fn request(&self) -> (&'static str, Vec<(&'static str, &str)>) {
        match self {
            Commands::Hello => ("/", vec![]),
            Commands::Name { name } => ("/name", vec![("q", name.as_str())]),
            Commands::Add { key, value } => ("/add", vec![("k", key.as_str()), ("v", value.as_str())]),
            Commands::Get { key } => ("/get", vec![("k", key.as_str())]),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let (path, query) = cli.command.request();
    let res = client
        .get(format!("{}{}", cli.url.trim_end_matches('/'), path))
        .query(&query)
        .send()
        .await?;

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        eprintln!("Response: {}", text);
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
