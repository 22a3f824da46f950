//! Delete command implementation.

use parish_core::{Kind, Store};

/// Runs the delete command.
pub fn run(store: &Store, kind: &str, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let kind: Kind = kind.parse()?;

    let Some(entity) = store.get(kind, id) else {
        return Err(format!("{kind} {id} not found").into());
    };

    store.remove(&entity)?;
    store.persist()?;

    println!("deleted {kind} {id}");
    Ok(())
}
