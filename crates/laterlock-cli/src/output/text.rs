//! Text output for lock status, receipts and disclosures.

use laterlock_core::{GateReceipt, LockStatus};

use crate::ui::format::{format_countdown, format_minutes, format_timestamp_millis};
use crate::ui::render::badge;
use crate::ui::theme::Badge;
use crate::ui::{header, hint, kv, print, receipt, UiContext};

fn state_badge(state: &str) -> Badge {
    match state {
        "locked" => Badge::Info,
        "pending" => Badge::Warn,
        _ => Badge::Ok,
    }
}

/// Key-value lines describing a lock.
pub fn status_lines(ctx: &UiContext, status: &LockStatus) -> Vec<String> {
    let pretty = ctx.mode.is_pretty();
    let mut lines = vec![kv(ctx, "ID", status.id.as_str())];
    if let Some(title) = &status.title {
        lines.push(kv(ctx, "Title", title));
    }
    lines.push(kv(
        ctx,
        "Delay",
        &format_minutes(u64::from(status.delay_minutes)),
    ));
    lines.push(kv(ctx, "Seal Mode", status.seal_mode.as_str()));
    if pretty {
        let state = badge(ctx, state_badge(&status.state), &status.state);
        lines.push(kv(ctx, "State", &state));
    } else {
        lines.push(kv(ctx, "State", &status.state));
    }
    if status.remaining_milliseconds > 0 {
        let remaining = if pretty {
            format_countdown(status.remaining_milliseconds)
        } else {
            status.remaining_milliseconds.to_string()
        };
        lines.push(kv(ctx, "Remaining", &remaining));
    }
    if let Some(requested) = status.access_requested_at {
        lines.push(kv(
            ctx,
            "Requested",
            &format_timestamp_millis(requested, pretty),
        ));
    }
    lines.push(kv(
        ctx,
        "Created",
        &format_timestamp_millis(status.created_at, pretty),
    ));
    lines
}

/// Hint for the next step given the lock's state.
pub fn next_step_hint(status: &LockStatus) -> String {
    let id = status.id.as_str();
    match status.state.as_str() {
        "locked" => format!("Run `laterlock request {}` to start the countdown.", id),
        "pending" => format!(
            "Run `laterlock show {}` to check again, or `laterlock cancel {}`.",
            id, id
        ),
        _ => format!("Run `laterlock view {}` to read the content.", id),
    }
}

pub fn print_status(ctx: &UiContext, status: &LockStatus) {
    print(ctx, &header(ctx, "show", Some(status.id.as_str())));
    for line in status_lines(ctx, status) {
        print(ctx, &line);
    }
    if ctx.mode.is_pretty() {
        print(ctx, &hint(ctx, &next_step_hint(status)));
    }
}

pub fn print_receipt(ctx: &UiContext, id: &str, result: &GateReceipt) {
    let remaining = if ctx.mode.is_pretty() {
        format_countdown(result.remaining_milliseconds)
    } else {
        result.remaining_milliseconds.to_string()
    };
    let mut items = vec![("ID", id), ("State", result.state.as_str())];
    if result.remaining_milliseconds > 0 {
        items.push(("Remaining", remaining.as_str()));
    }
    print(ctx, &receipt(ctx, &result.message, &items));
}

#[cfg(test)]
mod tests {
    use super::*;
    use laterlock_core::{LockId, SealMode};

    use crate::ui::OutputMode;

    fn plain_ctx() -> UiContext {
        UiContext {
            is_tty: false,
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        }
    }

    fn status(state: &str, remaining: u64) -> LockStatus {
        LockStatus {
            id: LockId::parse("abc123").unwrap(),
            title: Some("Snacks".to_string()),
            delay_minutes: 90,
            is_encrypted: true,
            seal_mode: SealMode::Passphrase,
            access_requested_at: Some(1_700_000_000_000),
            created_at: 1_699_999_000_000,
            remaining_milliseconds: remaining,
            state: state.to_string(),
        }
    }

    #[test]
    fn test_status_lines_plain() {
        let lines = status_lines(&plain_ctx(), &status("pending", 5_000));
        assert_eq!(lines[0], "id=abc123");
        assert!(lines.contains(&"title=Snacks".to_string()));
        assert!(lines.contains(&"delay=1 hour and 30 minutes".to_string()));
        assert!(lines.contains(&"seal_mode=passphrase".to_string()));
        assert!(lines.contains(&"state=pending".to_string()));
        assert!(lines.contains(&"remaining=5000".to_string()));
    }

    #[test]
    fn test_status_lines_skip_zero_remaining() {
        let lines = status_lines(&plain_ctx(), &status("eligible", 0));
        assert!(!lines.iter().any(|l| l.starts_with("remaining=")));
    }

    #[test]
    fn test_status_lines_pretty_badges_state() {
        let ctx = UiContext {
            is_tty: true,
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Pretty,
        };
        let lines = status_lines(&ctx, &status("pending", 5_000));
        assert!(lines.contains(&"State: [WARN] pending".to_string()));
        assert!(lines.contains(&"Remaining: 00:00:05".to_string()));

        let lines = status_lines(&ctx, &status("locked", 0));
        assert!(lines.contains(&"State: [INFO] locked".to_string()));
    }

    #[test]
    fn test_next_step_hint_follows_state() {
        assert!(next_step_hint(&status("locked", 0)).contains("laterlock request abc123"));
        assert!(next_step_hint(&status("pending", 10)).contains("laterlock cancel abc123"));
        assert!(next_step_hint(&status("eligible", 0)).contains("laterlock view abc123"));
    }
}
