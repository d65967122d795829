use clap::CommandFactory;
use clap_complete::generate;

use crate::app::AppContext;
use crate::cli::{Cli, CompletionsArgs, ServeArgs};
use crate::constants::DEFAULT_BIND;
use crate::server;

pub fn handle_completions(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "laterlock", &mut std::io::stdout());
    Ok(())
}

pub fn handle_serve(ctx: &AppContext, args: &ServeArgs) -> anyhow::Result<()> {
    let bind = match &args.bind {
        Some(value) => value.clone(),
        None => ctx
            .config()?
            .map(|config| config.server.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string()),
    };

    let service = ctx.open_service()?;
    if !ctx.quiet() && !ctx.cli().json {
        eprintln!("Serving LaterLock API on http://{}", bind);
    }
    server::serve(service, &bind)
}
