//! Show command implementation.

use parish_core::{Kind, Store};
use serde_json::Value;

/// Runs the show command.
pub fn run(store: &Store, kind: &str, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let kind: Kind = kind.parse()?;

    let Some(entity) = store.get(kind, id) else {
        return Err(format!("{kind} {id} not found").into());
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&Value::Object(entity.to_map()?))?
    );
    Ok(())
}
