use std::{
    error::Error,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use handlenet_lib::{
    ApiResponse, HandleClient, HandleConfig, HandleRecord, Session, ValueEntry,
    types::{AdminValue, ResponseEnvelope},
};
use serde::Serialize;
use tracing::{info, warn};

/// Command line client for a Handle System REST server.
///
/// Connection settings and the admin key are read from `HANDLE_*`
/// environment variables.
#[derive(Parser)]
#[command(name = "handlenet")]
#[command(version)]
pub struct Cli {
    /// Print responses as single-line JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate and print the session id
    Auth,
    /// List handles under a prefix
    List { prefix: String },
    /// Print one handle record
    Get { handle: String },
    /// Create a handle from a JSON record file
    Create {
        handle: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Overwrite values of an existing handle from a JSON record file
    Update {
        handle: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a handle
    Delete { handle: String },
    /// Create, list, read, update and delete the configured test handle
    Roundtrip,
}

pub async fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let config = HandleConfig::from_env()?;
    let client = HandleClient::new(config)?;
    let session = client.authenticate().await?;

    let output = if cli.json {
        Output::Compact
    } else {
        Output::Pretty
    };
    match cli.command {
        Command::Auth => {
            println!("{}", session.id());
            Ok(ExitCode::SUCCESS)
        }
        Command::List { prefix } => {
            output.print(&client.list_handles(&session, &prefix).await?)
        }
        Command::Get { handle } => output.print(&client.get_handle(&session, &handle).await?),
        Command::Create { handle, file } => {
            let record = read_record(&file).await?;
            output.print(&client.create_handle(&session, &handle, &record).await?)
        }
        Command::Update { handle, file } => {
            let record = read_record(&file).await?;
            output.print(&client.update_handle(&session, &handle, &record).await?)
        }
        Command::Delete { handle } => {
            output.print(&client.delete_handle(&session, &handle).await?)
        }
        Command::Roundtrip => roundtrip(&client, &session).await,
    }
}

async fn read_record(path: &Path) -> Result<HandleRecord, Box<dyn Error>> {
    let raw = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&raw)?)
}

#[derive(Debug, Clone, Copy)]
enum Output {
    Pretty,
    Compact,
}

impl Output {
    fn print<T: Serialize + ResponseEnvelope>(
        self,
        response: &ApiResponse<T>,
    ) -> Result<ExitCode, Box<dyn Error>> {
        let rendered = match self {
            Output::Pretty => serde_json::to_string_pretty(&response.body)?,
            Output::Compact => serde_json::to_string(&response.body)?,
        };
        println!("{}", rendered);
        if response.is_success() {
            Ok(ExitCode::SUCCESS)
        } else {
            warn!(
                "request failed (status={}, response_code={})",
                response.status,
                response.response_code()
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn roundtrip(client: &HandleClient, session: &Session) -> Result<ExitCode, Box<dyn Error>> {
    let config = client.config();
    let handle = config.test_handle.clone();
    let record = HandleRecord::new(
        handle.clone(),
        vec![
            ValueEntry::text(1, "URL", "https://example.com"),
            ValueEntry::text(2, "EMAIL", "email@example.com"),
            ValueEntry::admin(100, AdminValue::full_control(&config.auth_id)),
        ],
    );
    let update =
        HandleRecord::with_values(vec![ValueEntry::text(2, "EMAIL", "email2@example.com")]);

    let steps = [
        (
            "create",
            client
                .create_handle(session, &handle, &record)
                .await?
                .response_code(),
        ),
        (
            "list",
            client
                .list_handles(session, config.test_prefix())
                .await?
                .response_code(),
        ),
        (
            "get",
            client.get_handle(session, &handle).await?.response_code(),
        ),
        (
            "update",
            client
                .update_handle(session, &handle, &update)
                .await?
                .response_code(),
        ),
        (
            "delete",
            client.delete_handle(session, &handle).await?.response_code(),
        ),
    ];

    let mut failed = false;
    for (step, code) in steps {
        if code.is_success() {
            info!("{} {}: {}", step, handle, code);
        } else {
            warn!("{} {}: {}", step, handle, code);
            failed = true;
        }
    }
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
