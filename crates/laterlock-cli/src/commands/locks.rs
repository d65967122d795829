use laterlock_core::crypto::{self, Envelope, Salt};
use laterlock_core::{
    CreateLockRequest, Disclosure, DisclosureGate, DisclosureResponse, GateReceipt,
    LaterlockError, LockId, SealMode, SqliteLockStore, SystemClock,
};
use zeroize::Zeroizing;

use crate::app::AppContext;
use crate::cli::{CreateArgs, DeleteArgs, LockIdArgs, ViewArgs};
use crate::errors::CliError;
use crate::helpers::{
    confirm, parse_delay, parse_lock_id, prompt_new_passphrase, prompt_passphrase, read_content,
};
use crate::output::{
    disclosure_json, next_step_hint, print_receipt, print_status, receipt_json, status_json,
};
use crate::ui::format::format_minutes;
use crate::ui::{divider, header, hint, print, receipt, Spinner};

type CliGate = DisclosureGate<SqliteLockStore, SystemClock>;

/// Attach the lock ID to core errors so the user gets a useful hint.
fn lock_error(err: LaterlockError, id: &LockId) -> anyhow::Error {
    match CliError::from_core(&err, Some(id.as_str())) {
        Some(cli_err) => cli_err.into(),
        None => err.into(),
    }
}

pub fn handle_create(ctx: &AppContext, args: &CreateArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context();
    let interactive = ui_ctx.is_interactive() && !ctx.no_input();

    let delay_minutes = parse_delay(&args.delay)?;
    let content = read_content(ctx.no_input(), args.content.clone())?;
    let service = ctx.open_service()?;

    let max_chars = service.limits().max_plaintext_chars;
    if content.chars().count() > max_chars {
        return Err(CliError::invalid_input(format!(
            "Content exceeds maximum length of {} characters",
            max_chars
        ))
        .into());
    }

    let mut request = CreateLockRequest {
        title: args.title.clone(),
        delay_minutes: Some(i64::from(delay_minutes)),
        ..Default::default()
    };

    let status = if args.passphrase {
        let passphrase = prompt_new_passphrase(interactive)?;
        let spinner = Spinner::start(&ui_ctx, "Sealing with passphrase");
        let sealed = crypto::seal(&content, &passphrase);
        spinner.finish();
        let sealed = sealed?;
        request.encrypted_content = Some(sealed.envelope.into_string());
        request.salt = Some(sealed.salt.to_hex());
        service.create(request)?
    } else {
        request.content = Some(content.to_string());
        let spinner = Spinner::start(&ui_ctx, "Sealing with system key");
        let created = service.create(request);
        spinner.finish();
        created?
    };

    if ui_ctx.mode.is_json() {
        return status_json(&status);
    }
    if ctx.quiet() {
        println!("{}", status.id);
        return Ok(());
    }

    let delay_display = format_minutes(u64::from(status.delay_minutes));
    let mut items = vec![("ID", status.id.as_str())];
    if let Some(title) = &status.title {
        items.push(("Title", title.as_str()));
    }
    items.push(("Delay", delay_display.as_str()));
    items.push(("Seal Mode", status.seal_mode.as_str()));
    items.push(("State", status.state.as_str()));
    print(&ui_ctx, &receipt(&ui_ctx, "Lock created", &items));
    if ui_ctx.mode.is_pretty() {
        print(&ui_ctx, &hint(&ui_ctx, &next_step_hint(&status)));
        if status.seal_mode.is_passphrase() {
            print(
                &ui_ctx,
                &hint(&ui_ctx, "The passphrase cannot be recovered. Keep it somewhere safe."),
            );
        }
    }
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &LockIdArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context();
    let id = parse_lock_id(&args.id)?;
    let service = ctx.open_service()?;
    let status = service.status(&id).map_err(|e| lock_error(e, &id))?;

    if ui_ctx.mode.is_json() {
        return status_json(&status);
    }
    print_status(&ui_ctx, &status);
    Ok(())
}

fn run_gate_action<F>(ctx: &AppContext, raw_id: &str, action: F) -> anyhow::Result<()>
where
    F: FnOnce(&CliGate, &LockId) -> laterlock_core::Result<GateReceipt>,
{
    let ui_ctx = ctx.ui_context();
    let id = parse_lock_id(raw_id)?;
    let service = ctx.open_service()?;
    let result = action(service.gate(), &id).map_err(|e| lock_error(e, &id))?;

    if ui_ctx.mode.is_json() {
        return receipt_json(id.as_str(), &result);
    }
    if !ctx.quiet() {
        print_receipt(&ui_ctx, id.as_str(), &result);
    }
    Ok(())
}

pub fn handle_request(ctx: &AppContext, args: &LockIdArgs) -> anyhow::Result<()> {
    run_gate_action(ctx, &args.id, |gate, id| gate.request_access(id))
}

pub fn handle_cancel(ctx: &AppContext, args: &LockIdArgs) -> anyhow::Result<()> {
    run_gate_action(ctx, &args.id, |gate, id| gate.cancel_request(id))
}

pub fn handle_relock(ctx: &AppContext, args: &LockIdArgs) -> anyhow::Result<()> {
    run_gate_action(ctx, &args.id, |gate, id| gate.re_lock(id))
}

fn unseal_locally(
    ctx: &AppContext,
    envelope: &Envelope,
    salt: &Salt,
) -> anyhow::Result<Zeroizing<String>> {
    let ui_ctx = ctx.ui_context();
    let passphrase = prompt_passphrase(ui_ctx.is_interactive() && !ctx.no_input())?;
    let spinner = Spinner::start(&ui_ctx, "Unsealing");
    let result = crypto::unseal(envelope, &passphrase, salt);
    spinner.finish();
    match result {
        Ok(plaintext) => Ok(Zeroizing::new(plaintext)),
        Err(err) => Err(CliError::from_core(&err, None)
            .map(Into::into)
            .unwrap_or_else(|| err.into())),
    }
}

pub fn handle_view(ctx: &AppContext, args: &ViewArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context();
    let id = parse_lock_id(&args.id)?;
    let service = ctx.open_service()?;

    let spinner = Spinner::start(&ui_ctx, "Opening lock");
    let disclosure = service.gate().disclose(&id);
    spinner.finish();
    let disclosure = disclosure.map_err(|e| lock_error(e, &id))?;

    let content = match &disclosure {
        Disclosure::Sealed { .. } if args.sealed => {
            return print_sealed(ctx, &id, &disclosure.to_response());
        }
        Disclosure::Sealed { envelope, salt } => unseal_locally(ctx, envelope, salt)?,
        Disclosure::Plaintext(text) => Zeroizing::new(text.clone()),
    };

    if ui_ctx.mode.is_json() {
        return disclosure_json(&DisclosureResponse {
            content: content.to_string(),
            seal_mode: disclosure.seal_mode(),
            is_encrypted: false,
            salt: None,
        });
    }

    if ui_ctx.mode.is_pretty() && !ctx.quiet() {
        print(&ui_ctx, &header(&ui_ctx, "view", Some(id.as_str())));
        print(&ui_ctx, &divider(&ui_ctx));
        println!("{}", content.as_str());
        print(&ui_ctx, &divider(&ui_ctx));
        print(
            &ui_ctx,
            &hint(
                &ui_ctx,
                &format!("Run `laterlock relock {}` to lock it again.", id),
            ),
        );
    } else {
        println!("{}", content.as_str());
    }
    Ok(())
}

fn print_sealed(ctx: &AppContext, id: &LockId, response: &DisclosureResponse) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context();
    if ui_ctx.mode.is_json() {
        return disclosure_json(response);
    }
    let salt = response.salt.as_deref().unwrap_or_default();
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            "Sealed content",
            &[
                ("ID", id.as_str()),
                ("Seal Mode", SealMode::Passphrase.as_str()),
                ("Content", response.content.as_str()),
                ("Salt", salt),
            ],
        ),
    );
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context();
    let id = parse_lock_id(&args.id)?;

    if !args.yes {
        if !ui_ctx.is_interactive() || ctx.no_input() {
            return Err(CliError::invalid_input(
                "Refusing to delete without confirmation\nHint: Pass --yes to delete non-interactively.",
            )
            .into());
        }
        if !confirm(&format!("Delete lock {} permanently?", id))? {
            return Err(anyhow::anyhow!("Deletion cancelled"));
        }
    }

    let service = ctx.open_service()?;
    service.delete(&id).map_err(|e| lock_error(e, &id))?;

    if ui_ctx.mode.is_json() {
        return crate::output::print_json(&serde_json::json!({
            "id": id,
            "message": "Lock deleted successfully",
        }));
    }
    if !ctx.quiet() {
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Lock deleted successfully", &[("ID", id.as_str())]),
        );
    }
    Ok(())
}
