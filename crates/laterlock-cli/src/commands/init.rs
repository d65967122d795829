use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use laterlock_core::{SqliteLockStore, VERSION};

use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::{default_db_path, default_keyfile_path, write_config, LaterlockConfig};
use crate::errors::CliError;
use crate::output::print_json;
use crate::security::write_keyfile;
use crate::ui::theme::{styled, styles};
use crate::ui::{hint, print, receipt, UiContext};

/// Print a step indicator for the setup flow.
fn print_step(ctx: &UiContext, step: usize, total: usize, title: &str, detail: Option<&str>) {
    if !ctx.mode.is_pretty() {
        return;
    }
    let progress = styled(&format!("{}/{}", step, total), styles::dim(), ctx.color);
    println!("{}  {}", progress, styled(title, styles::bold(), ctx.color));
    if let Some(text) = detail {
        println!("    {}", styled(text, styles::dim(), ctx.color));
    }
}

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context();
    let interactive = ui_ctx.is_interactive() && !ctx.no_input();
    let total_steps = 3;

    let config_path = ctx.config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists: {}\nHint: Use `laterlock init --force` to rewrite it. The system key is kept.",
            config_path.display()
        ))
        .into());
    }

    if !ctx.quiet() && ui_ctx.mode.is_pretty() {
        let title = styled("LaterLock", styles::bold(), ui_ctx.color);
        println!("{} \u{00B7} init", title);
        println!(
            "{}\n",
            styled(&format!("v{}", VERSION), styles::dim(), ui_ctx.color)
        );
    }

    let db_path = match args.path.clone().or_else(|| ctx.cli().db.clone()) {
        Some(value) => PathBuf::from(value),
        None if interactive => {
            print_step(
                &ui_ctx,
                1,
                total_steps,
                "Choose location",
                Some("Where the lock database will live."),
            );
            let input: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Database location")
                .default(default_db_path()?.to_string_lossy().to_string())
                .interact_text()?;
            println!();
            PathBuf::from(input)
        }
        None => default_db_path()?,
    };

    let keyfile_path = match &args.keyfile {
        Some(value) => PathBuf::from(value),
        None => default_keyfile_path()?,
    };
    if interactive {
        print_step(
            &ui_ctx,
            2,
            total_steps,
            "System key",
            Some("Seals locks created without a passphrase."),
        );
    }
    let key_created = if keyfile_path.exists() {
        tracing::debug!(path = %keyfile_path.display(), "keeping existing system key");
        false
    } else {
        write_keyfile(&keyfile_path)?;
        true
    };

    if interactive {
        print_step(&ui_ctx, 3, total_steps, "Create database", None);
    }
    write_config(&config_path, &LaterlockConfig::new(&db_path, &keyfile_path))?;
    SqliteLockStore::open(&db_path)?;

    if ui_ctx.mode.is_json() {
        return print_json(&serde_json::json!({
            "config": config_path,
            "database": db_path,
            "systemKeyFile": keyfile_path,
            "systemKeyCreated": key_created,
        }));
    }

    if !ctx.quiet() {
        let config_display = config_path.display().to_string();
        let db_display = db_path.display().to_string();
        let key_display = keyfile_path.display().to_string();
        let key_status = if key_created { "created" } else { "kept" };
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "LaterLock initialized",
                &[
                    ("Config", config_display.as_str()),
                    ("Database", db_display.as_str()),
                    ("System Key", key_display.as_str()),
                    ("System Key Status", key_status),
                ],
            ),
        );
        if ui_ctx.mode.is_pretty() {
            print(
                &ui_ctx,
                &hint(&ui_ctx, "Back up the system key file; locks sealed with it cannot be read without it."),
            );
        }
    }
    Ok(())
}
