//! JSON output for lock status, receipts and disclosures.

use laterlock_core::{DisclosureResponse, GateReceipt, LockStatus};
use serde::Serialize;

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{}", rendered);
    Ok(())
}

pub fn status_json(status: &LockStatus) -> anyhow::Result<()> {
    print_json(status)
}

pub fn receipt_json(id: &str, receipt: &GateReceipt) -> anyhow::Result<()> {
    let mut value = serde_json::to_value(receipt)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("id".to_string(), serde_json::Value::String(id.to_string()));
    }
    print_json(&value)
}

pub fn disclosure_json(response: &DisclosureResponse) -> anyhow::Result<()> {
    print_json(response)
}
