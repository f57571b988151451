use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iot_services_client::config::loader::{file_to_config, ClientConfigFile};
use iot_services_client::request::{Reply, Request, ResponseBody};
use iot_services_client::resilience::retry::RetrySettings;
use iot_services_client::utils::logging::{self, LogLevel};
use iot_services_client::IotClient;
use tracing::{debug, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML client configuration; optional
    #[arg(short, long, env = "CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// name of the service binding holding the IoT service key
    #[arg(long, env = "SERVICE_NAME")]
    service_name: Option<String>,
    /// attempts per call for retryable errors
    #[arg(long, default_value_t = 1)]
    attempts: u32,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print an access token
    Token,
    /// List the destination table
    Destinations,
    /// GET a resource path or absolute url
    Get {
        path: String,
        /// logical service the path is relative to
        #[arg(long)]
        service: Option<String>,
        /// print status and headers too
        #[arg(long)]
        full: bool,
    },
    /// DELETE a resource guarded by its etag
    Delete {
        path: String,
        #[arg(long)]
        etag: String,
        #[arg(long)]
        service: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config_file = match &args.config {
        Some(path) => file_to_config(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfigFile::default(),
    };
    logging::run(&config_file.settings, args.log_level);

    let mut builder = IotClient::builder()
        .process_env()
        .settings(config_file.settings.clone());
    if let Some(connection) = config_file.connection.clone() {
        builder = builder.explicit(connection);
    }
    if let Some(service_name) = args.service_name.clone().or(config_file.service_name.clone()) {
        builder = builder.service_name(service_name);
    }
    let mut client = builder.build()?;
    let retry = RetrySettings::default().with_attempts(args.attempts);
    info!("client ready");

    match args.command {
        Command::Token => {
            let client = &client;
            let token = retry.run_with_retry(move || client.access_token()).await?;
            println!("{token}");
        }
        Command::Destinations => {
            let mut destinations: Vec<_> = client.navigator().destinations().iter().collect();
            destinations.sort();
            for (service, url) in destinations {
                println!("{service}\t{url}");
            }
        }
        Command::Get {
            path,
            service,
            full,
        } => {
            if let Some(service) = service {
                client.set_base_url(&service)?;
            }
            let (client, path) = (&client, path.as_str());
            let reply = retry
                .run_with_retry(move || {
                    let request = Request::get(path);
                    let request = if full { request.full_response() } else { request };
                    client.request(request)
                })
                .await?;
            print_reply(&reply)?;
        }
        Command::Delete {
            path,
            etag,
            service,
        } => {
            if let Some(service) = service {
                client.set_base_url(&service)?;
            }
            let request = Request::delete(path.as_str())
                .header("if-match", &etag)?
                .full_response();
            let client = &client;
            let reply = retry
                .run_with_retry(move || client.request(request.clone()))
                .await?;
            debug!(status = ?reply.full().map(|f| f.status), "deleted");
            print_reply(&reply)?;
        }
    }
    Ok(())
}

fn print_reply(reply: &Reply) -> Result<()> {
    if let Some(full) = reply.full() {
        println!("{}", full.status);
        for (name, value) in &full.headers {
            println!("{name}: {}", value.to_str().unwrap_or("<binary>"));
        }
        println!();
    }
    match reply.body() {
        ResponseBody::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        ResponseBody::Raw(text) => println!("{text}"),
        ResponseBody::Empty => {}
    }
    Ok(())
}
