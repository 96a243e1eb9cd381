use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, COOKIE};
use reqwest::Method;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "mixer-cli")]
#[command(about = "Command-line client for the Mixer content API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Session token, sent as a bearer credential
    #[arg(short, long, env = "MIXER_SESSION")]
    session: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness probe
    Health,
    /// Fetch a fresh CSRF token
    Csrf,
    /// Show the identity behind the session
    Me,
    /// Brand catalogue
    Brands {
        #[command(subcommand)]
        command: BrandCommands,
    },
    /// Operator endpoints
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum BrandCommands {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    Get {
        id: String,
    },
    Create {
        name: String,
        #[arg(long)]
        website_url: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        language: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    Status,
    /// Drop cache entries under a key prefix
    Purge {
        prefix: String,
    },
}

struct ApiClient {
    http: reqwest::Client,
    base: String,
    session: Option<String>,
}

impl ApiClient {
    fn headers(&self) -> Result<HeaderMap, Box<dyn std::error::Error>> {
        let mut headers = HeaderMap::new();
        if let Some(session) = &self.session {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {session}"))?);
        }
        Ok(headers)
    }

    async fn read(&self, path: &str) -> Result<reqwest::Response, Box<dyn std::error::Error>> {
        Ok(self
            .http
            .get(format!("{}{}", self.base, path))
            .headers(self.headers()?)
            .send()
            .await?)
    }

    /// State-changing call: fetch a token, then echo it as cookie and header.
    async fn write(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<reqwest::Response, Box<dyn std::error::Error>> {
        let token = self.csrf_token().await?;

        let mut headers = self.headers()?;
        headers.insert(COOKIE, HeaderValue::from_str(&format!("csrf_token={token}"))?);
        headers.insert("x-csrf-token", HeaderValue::from_str(&token)?);

        let mut request = self
            .http
            .request(method, format!("{}{}", self.base, path))
            .headers(headers);
        if let Some(body) = body {
            request = request.json(&body);
        }
        Ok(request.send().await?)
    }

    async fn csrf_token(&self) -> Result<String, Box<dyn std::error::Error>> {
        let envelope: Value = self.read("/api/csrf").await?.json().await?;
        envelope["data"]["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| "CSRF endpoint returned no token".into())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = ApiClient {
        http: reqwest::Client::new(),
        base: cli.url.trim_end_matches('/').to_string(),
        session: cli.session,
    };

    let res = match cli.command {
        Commands::Health => client.read("/api/health").await?,
        Commands::Csrf => client.read("/api/csrf").await?,
        Commands::Me => client.read("/api/me").await?,
        Commands::Brands { command } => match command {
            BrandCommands::List { page, limit } => {
                client.read(&format!("/api/brands?page={page}&limit={limit}")).await?
            }
            BrandCommands::Get { id } => client.read(&format!("/api/brands/{id}")).await?,
            BrandCommands::Create {
                name,
                website_url,
                country,
                language,
            } => {
                let body = json!({
                    "name": name,
                    "websiteUrl": website_url,
                    "country": country,
                    "language": language,
                });
                client.write(Method::POST, "/api/brands", Some(body)).await?
            }
            BrandCommands::Delete { id } => {
                client.write(Method::DELETE, &format!("/api/brands/{id}"), None).await?
            }
        },
        Commands::Admin { command } => match command {
            AdminCommands::Status => client.read("/api/admin/status").await?,
            AdminCommands::Purge { prefix } => {
                client
                    .write(Method::POST, "/api/admin/cache/purge", Some(json!({ "prefix": prefix })))
                    .await?
            }
        },
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let correlation = res
        .headers()
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let body = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&body) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => body,
    };

    if status.is_success() {
        println!("{rendered}");
    } else {
        eprintln!("Error: API returned status {status} (correlation id {correlation})");
        eprintln!("{rendered}");
    }
    Ok(())
}
