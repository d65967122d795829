//! LaterLock CLI - store content that can only be read after a waiting period
//!
//! This is the command-line interface for LaterLock. It plays the
//! passphrase-holding client role locally and can serve the HTTP API.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;
mod security;
mod server;
mod ui;

use clap::Parser;
use laterlock_core::LaterlockError;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{init, locks, misc};
use crate::constants::exit_codes;
use crate::errors::CliError;
use crate::ui::render::print_error;

fn main() {
    let cli = Cli::parse();
    let serving = matches!(cli.command, Some(Commands::Serve(_)));
    logging::init_logging(cli.verbose, serving);

    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context();
        let (message, hint) = split_error_hint(&e.to_string());
        print_error(&ui_ctx, &message, hint.as_deref());
        std::process::exit(exit_code_for(&e));
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(ctx, args),
        Some(Commands::Create(args)) => locks::handle_create(ctx, args),
        Some(Commands::Show(args)) => locks::handle_show(ctx, args),
        Some(Commands::Request(args)) => locks::handle_request(ctx, args),
        Some(Commands::Cancel(args)) => locks::handle_cancel(ctx, args),
        Some(Commands::Relock(args)) => locks::handle_relock(ctx, args),
        Some(Commands::View(args)) => locks::handle_view(ctx, args),
        Some(Commands::Delete(args)) => locks::handle_delete(ctx, args),
        Some(Commands::Serve(args)) => misc::handle_serve(ctx, args),
        Some(Commands::Completions(args)) => misc::handle_completions(args),
        None => {
            println!("LaterLock v{}", laterlock_core::VERSION);
            println!("Run `laterlock --help` for usage.");
            Ok(())
        }
    }
}

/// Map an error to its exit code, looking through typed CLI and core errors.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    if let Some(core_err) = err.downcast_ref::<LaterlockError>() {
        return match core_err {
            LaterlockError::NotFound(_) => exit_codes::NOT_FOUND,
            LaterlockError::Validation(_) => exit_codes::INVALID_INPUT,
            LaterlockError::Decryption => exit_codes::AUTH_FAILED,
            LaterlockError::NotRequested | LaterlockError::WaitNotElapsed { .. } => {
                exit_codes::GATE_CLOSED
            }
            LaterlockError::Crypto(_) | LaterlockError::Storage(_) => 1,
        };
    }
    1
}

/// Split an embedded "Hint:" line off an error message.
fn split_error_hint(error: &str) -> (String, Option<String>) {
    match error.find("\nHint:") {
        Some(idx) => (
            error[..idx].to_string(),
            Some(error[idx + "\nHint:".len()..].trim().to_string()),
        ),
        None => (error.to_string(), contextual_hint(error)),
    }
}

/// Hints for common failures that don't carry their own.
fn contextual_hint(error: &str) -> Option<String> {
    let error_lower = error.to_lowercase();

    if error_lower.contains("system key is not configured") {
        return Some(
            "Run `laterlock init`, set LATERLOCK_SYSTEM_KEY, or use --passphrase.".to_string(),
        );
    }
    if error_lower.contains("failed to bind") {
        return Some("Pick another address with --bind or [server].bind.".to_string());
    }
    if error_lower.contains("keyfile") {
        return Some("Check [security].system_key_file in the config.".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_error_hint() {
        let (message, hint) = split_error_hint("Lock not found: x\nHint: Check the ID.");
        assert_eq!(message, "Lock not found: x");
        assert_eq!(hint.as_deref(), Some("Check the ID."));
    }

    #[test]
    fn test_contextual_hint() {
        let (_, hint) = split_error_hint("Encryption error: System key is not configured");
        assert!(hint.unwrap().contains("laterlock init"));
        let (_, hint) = split_error_hint("something else");
        assert!(hint.is_none());
    }

    #[test]
    fn test_exit_codes() {
        let err: anyhow::Error = LaterlockError::WaitNotElapsed {
            remaining_seconds: 1,
        }
        .into();
        assert_eq!(exit_code_for(&err), exit_codes::GATE_CLOSED);

        let err: anyhow::Error = CliError::invalid_input("bad").into();
        assert_eq!(exit_code_for(&err), exit_codes::INVALID_INPUT);

        let err = anyhow::anyhow!("plain");
        assert_eq!(exit_code_for(&err), 1);
    }
}
