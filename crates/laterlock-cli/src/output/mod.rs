//! Output formatting helpers for the CLI.
//!
//! Lock status, gate receipts and disclosures in JSON or text form.

mod json;
mod text;

pub use json::{disclosure_json, print_json, receipt_json, status_json};
pub use text::{next_step_hint, print_receipt, print_status};
