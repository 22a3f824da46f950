//! Update command implementation.

use parish_core::{Kind, Store};
use serde_json::Value;

/// Runs the update command.
pub fn run(
    store: &Store,
    kind: &str,
    id: &str,
    data: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: Kind = kind.parse()?;

    let Value::Object(patch) = serde_json::from_str(data)? else {
        return Err("--data must be a JSON object".into());
    };

    let Some(mut entity) = store.get(kind, id) else {
        return Err(format!("{kind} {id} not found").into());
    };
    entity.merge(&patch)?;
    entity.validate()?;

    let stored = store.add(entity)?;
    store.persist()?;

    println!(
        "{}",
        serde_json::to_string_pretty(&Value::Object(stored.to_map()?))?
    );
    Ok(())
}
