//! Roster CLI Tool
//!
//! Command-line client for a running activity roster service.
//!
//! Usage:
//!   cargo run --bin roster-cli -- list
//!   cargo run --bin roster-cli -- show "Chess Club"
//!   cargo run --bin roster-cli -- signup "Chess Club" student@mergington.edu
//!   cargo run --bin roster-cli -- unregister "Chess Club" student@mergington.edu

use activity_roster::web::{ErrorBody, MessageResponse};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "roster-cli")]
#[command(about = "Command-line client for the activity roster service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the roster service
    #[arg(long, default_value = "http://localhost:8000")]
    url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List every activity with its participants
    List,
    /// Show a single activity
    Show {
        /// Activity name
        activity: String,
    },
    /// Sign a student up for an activity
    Signup {
        /// Activity name
        activity: String,
        /// Student email
        email: String,
    },
    /// Remove a student from an activity
    Unregister {
        /// Activity name
        activity: String,
        /// Student email
        email: String,
    },
}

struct RosterClient {
    client: Client,
    base_url: reqwest::Url,
}

impl RosterClient {
    fn new(base_url: &str) -> Result<Self> {
        let base_url = reqwest::Url::parse(base_url)
            .with_context(|| format!("Invalid service URL: {}", base_url))?;

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// Append `activities/<path..>` to the base URL, keeping any path prefix
    /// and percent-encoding each segment
    fn activities_url(&self, path: &[&str]) -> Result<reqwest::Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Service URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .push("activities")
            .extend(path);
        Ok(url)
    }

    async fn list(&self) -> Result<Value> {
        let url = self.activities_url(&[])?;
        let response = self.client.get(url).send().await?;
        Self::parse(response).await
    }

    async fn show(&self, activity: &str) -> Result<Value> {
        let url = self.activities_url(&[activity])?;
        let response = self.client.get(url).send().await?;
        Self::parse(response).await
    }

    async fn mutate(&self, activity: &str, action: &str, email: &str) -> Result<String> {
        let url = self.activities_url(&[activity, action])?;
        let response = self
            .client
            .post(url)
            .query(&[("email", email)])
            .send()
            .await?;

        let body: MessageResponse = serde_json::from_value(Self::parse(response).await?)?;
        Ok(body.message)
    }

    async fn parse(response: Response) -> Result<Value> {
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response.json().await?);
        }

        match response.json::<ErrorBody>().await {
            Ok(body) => Err(anyhow!("{} ({})", body.detail, status)),
            Err(_) => Err(anyhow!("Request failed with status {}", status)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = RosterClient::new(&cli.url)?;

    match cli.command {
        Commands::List => {
            let activities = client.list().await?;
            println!("{}", serde_json::to_string_pretty(&activities)?);
        }
        Commands::Show { activity } => {
            let activity = client.show(&activity).await?;
            println!("{}", serde_json::to_string_pretty(&activity)?);
        }
        Commands::Signup { activity, email } => {
            println!("{}", client.mutate(&activity, "signup", &email).await?);
        }
        Commands::Unregister { activity, email } => {
            println!("{}", client.mutate(&activity, "unregister", &email).await?);
        }
    }

    Ok(())
}
