use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use laterlock_core::VERSION;

/// LaterLock - store content that can only be read after a waiting period
#[derive(Parser)]
#[command(name = "laterlock")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the lock database
    #[arg(long, global = true, env = "LATERLOCK_DB")]
    pub db: Option<String>,

    /// Path to the config file
    #[arg(long, global = true, env = "LATERLOCK_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Force plain key=value output
    #[arg(long, global = true)]
    pub plain: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_input: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Database path to record in the config
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// System key file path
    #[arg(long)]
    pub keyfile: Option<String>,

    /// Overwrite an existing config (the system key is never replaced)
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `create` command
#[derive(Args)]
pub struct CreateArgs {
    /// Optional display title
    #[arg(long)]
    pub title: Option<String>,

    /// Waiting period, e.g. 90, 90m, 12h, 3d, 1w (bare numbers are minutes)
    #[arg(short, long, value_name = "DELAY")]
    pub delay: String,

    /// Content to lock (otherwise read from stdin or prompted)
    #[arg(long)]
    pub content: Option<String>,

    /// Seal with a passphrase instead of the system key
    #[arg(long)]
    pub passphrase: bool,
}

/// Arguments for commands that take a lock ID
#[derive(Args)]
pub struct LockIdArgs {
    /// Lock ID
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `view` command
#[derive(Args)]
pub struct ViewArgs {
    /// Lock ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// Print the sealed envelope and salt instead of unsealing
    #[arg(long)]
    pub sealed: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Lock ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `serve` command
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long, env = "LATERLOCK_BIND")]
    pub bind: Option<String>,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write config, create the system key and the database
    Init(InitArgs),

    /// Create a new lock
    Create(CreateArgs),

    /// Show a lock's state and countdown
    Show(LockIdArgs),

    /// Request access and start the countdown
    Request(LockIdArgs),

    /// Cancel a pending request
    Cancel(LockIdArgs),

    /// Lock again after access was granted
    Relock(LockIdArgs),

    /// Reveal a lock's content once the wait has elapsed
    View(ViewArgs),

    /// Delete a lock permanently
    Delete(DeleteArgs),

    /// Run the HTTP API server
    Serve(ServeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
