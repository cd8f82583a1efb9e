use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "store-cli")]
#[command(about = "Command-line client for the store proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the proxy is up
    Health,
    /// List all products
    Products,
    /// Show one product
    Product { id: String },
    /// List all carts
    Carts,
    /// Show one cart
    Cart {
        id: String,
        #[arg(long)]
        user: u64,
    },
    /// Create a cart, or replace the products of an existing one
    ManageCart {
        #[arg(long)]
        user: u64,
        #[arg(long)]
        cart_id: Option<String>,
        /// Product as `<id>` or `<id>:<quantity>`, repeatable
        #[arg(long = "product", value_parser = parse_product)]
        products: Vec<Value>,
    },
    /// Delete a cart
    DeleteCart {
        id: String,
        #[arg(long)]
        user: u64,
    },
}

fn parse_product(raw: &str) -> Result<Value, String> {
    let (id, quantity) = match raw.split_once(':') {
        Some((id, quantity)) => (id, Some(quantity)),
        None => (raw, None),
    };

    let id: u64 = id.parse().map_err(|_| format!("invalid product id '{}'", id))?;
    match quantity {
        Some(q) => {
            let q: u64 = q.parse().map_err(|_| format!("invalid quantity '{}'", q))?;
            Ok(json!({ "id": id, "quantity": q }))
        }
        None => Ok(json!({ "id": id })),
    }
}

fn bearer(user: u64) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", user))?);
    Ok(headers)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/healthcheck", base)).send().await?,
        Commands::Products => client.get(format!("{}/products", base)).send().await?,
        Commands::Product { id } => {
            client
                .post(format!("{}/products/single-product", base))
                .json(&json!({ "id": id }))
                .send()
                .await?
        }
        Commands::Carts => client.get(format!("{}/carts", base)).send().await?,
        Commands::Cart { id, user } => {
            client
                .post(format!("{}/carts/get-cart", base))
                .headers(bearer(user)?)
                .json(&json!({ "cartId": id }))
                .send()
                .await?
        }
        Commands::ManageCart {
            user,
            cart_id,
            products,
        } => {
            let mut body = json!({ "products": products });
            if let Some(cart_id) = cart_id {
                body["cartId"] = Value::from(cart_id);
            }
            client
                .post(format!("{}/carts/manage-cart", base))
                .headers(bearer(user)?)
                .json(&body)
                .send()
                .await?
        }
        Commands::DeleteCart { id, user } => {
            client
                .post(format!("{}/carts/delete-cart", base))
                .headers(bearer(user)?)
                .json(&json!({ "cartId": id }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: store proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
