//! Command-line transport for the message store.
//!
//! # Responsibility
//! - Route `create`/`list`/`get` commands to the request handler.
//! - Print each outcome as a JSON envelope with an HTTP-style status.
//!
//! # Invariants
//! - Exit code is `0` only for successful outcomes.

use clap::{Parser, Subcommand};
use postbox_core::db::open_db;
use postbox_core::{
    core_version, init_logging, CoreConfig, CreateMessageRequest, MessageId, MessageService,
    RepoError, Reply, ServiceError, ServiceResult, SqliteMessageRepository,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;

/// Postbox CLI
#[derive(Parser, Debug)]
#[command(name = "postbox")]
#[command(about = "Store and read text messages")]
struct Args {
    /// SQLite database file (overrides POSTBOX_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a new message
    Create {
        /// Message text
        content: String,
    },

    /// List every stored message
    List,

    /// Fetch one message by id
    Get {
        /// Message id
        #[arg(allow_negative_numbers = true)]
        id: MessageId,
    },

    /// Print the core version
    Version,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Commands::Version = args.command {
        println!("postbox_core version={}", core_version());
        return ExitCode::SUCCESS;
    }

    let mut config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("postbox: {err}");
            return ExitCode::from(2);
        }
    };
    if let Some(db) = args.db {
        config = config.with_db_path(db);
    }
    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("postbox: {err}");
            return ExitCode::from(2);
        }
    }

    let (status, body) = execute(&config, args.command);
    println!("{}", json!({ "status": status, "body": body }));
    if status < 400 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn execute(config: &CoreConfig, command: Commands) -> (u16, Value) {
    match command {
        Commands::Create { content } => with_service(config, |service| {
            render(service.create_message(&CreateMessageRequest::new(content)))
        }),
        Commands::List => with_service(config, |service| render(service.list_messages())),
        Commands::Get { id } => with_service(config, |service| render(service.get_message(id))),
        Commands::Version => (200, json!(core_version())),
    }
}

/// Opens storage and runs `handle` against a request handler.
fn with_service(
    config: &CoreConfig,
    handle: impl FnOnce(&MessageService<SqliteMessageRepository<'_>>) -> (u16, Value),
) -> (u16, Value) {
    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => return render_error(&ServiceError::from(RepoError::from(err))),
    };
    let repo = match SqliteMessageRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => return render_error(&ServiceError::from(err)),
    };
    handle(&MessageService::new(repo))
}

fn render<T: Serialize>(result: ServiceResult<Reply<T>>) -> (u16, Value) {
    match result {
        Ok(reply) => match serde_json::to_value(&reply.body) {
            Ok(body) => (reply.status.status_code(), body),
            Err(err) => {
                log::error!("event=cli_render module=cli status=error error={err}");
                (500, json!({ "error": "internal_error", "message": "response encoding failed" }))
            }
        },
        Err(err) => render_error(&err),
    }
}

fn render_error(err: &ServiceError) -> (u16, Value) {
    let body = err.to_body();
    (
        err.status_code(),
        json!({ "error": body.error, "message": body.message }),
    )
}
