//! List command implementation.

use parish_core::{Kind, Store};
use serde_json::Value;

/// Runs the list command.
pub fn run(store: &Store, kind: &str) -> Result<(), Box<dyn std::error::Error>> {
    let kind: Kind = kind.parse()?;

    let mut maps = Vec::new();
    for entity in store.all(Some(kind)).into_values() {
        maps.push(Value::Object(entity.to_map()?));
    }

    println!("{}", serde_json::to_string_pretty(&Value::Array(maps))?);
    Ok(())
}
