//! Verify command implementation.

use parish_core::{Kind, Store};
use serde_json::Value;

/// Reference fields between kinds: (owner, field, target).
///
/// Deletes never cascade, so a sweep is how an operator finds records
/// whose references have gone stale.
const REFERENCES: &[(Kind, &str, Kind)] = &[
    (Kind::Member, "department_id", Kind::Department),
    (Kind::Member, "group_id", Kind::Group),
    (Kind::User, "member_id", Kind::Member),
    (Kind::Department, "head", Kind::Member),
    (Kind::Group, "head", Kind::Member),
    (Kind::Group, "department_id", Kind::Department),
    (Kind::Attendance, "member_id", Kind::Member),
    (Kind::Attendance, "event_id", Kind::Event),
    (Kind::FinancialRecord, "event_id", Kind::Event),
    (Kind::FinancialRecord, "department_id", Kind::Department),
    (Kind::FinancialRecord, "group_id", Kind::Group),
    (Kind::Permission, "role_id", Kind::Role),
];

/// Verification result.
#[derive(Debug)]
pub struct VerifyResult {
    /// Number of records checked.
    pub records_checked: usize,
    /// Number of dangling references found.
    pub dangling_references: usize,
    /// Number of records whose timestamps are out of order.
    pub timestamp_issues: usize,
    /// List of problems found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn new() -> Self {
        Self {
            records_checked: 0,
            dangling_references: 0,
            timestamp_issues: 0,
            errors: Vec::new(),
        }
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs the verify command.
pub fn run(store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying store integrity");
    println!();

    let result = sweep(store)?;
    print_result(&result);

    println!();
    if result.is_ok() {
        println!("✓ Store verification passed");
        Ok(())
    } else {
        println!("✗ Store verification failed");
        Err("verification failed".into())
    }
}

fn sweep(store: &Store) -> Result<VerifyResult, Box<dyn std::error::Error>> {
    let mut result = VerifyResult::new();

    for (key, entity) in store.all(None) {
        result.records_checked += 1;

        let meta = entity.meta();
        if meta.updated_at < meta.created_at {
            result.timestamp_issues += 1;
            result
                .errors
                .push(format!("{key}: updated_at precedes created_at"));
        }

        let fields = entity.to_map()?;
        for (owner, field, target) in REFERENCES {
            if *owner != entity.kind() {
                continue;
            }
            if let Some(Value::String(id)) = fields.get(*field) {
                if store.get(*target, id).is_none() {
                    result.dangling_references += 1;
                    result
                        .errors
                        .push(format!("{key}: {field} '{id}' has no matching {target}"));
                }
            }
        }
    }

    Ok(result)
}

fn print_result(result: &VerifyResult) {
    println!("Records checked:     {}", result.records_checked);
    println!("Dangling references: {}", result.dangling_references);
    println!("Timestamp issues:    {}", result.timestamp_issues);
    for error in &result.errors {
        println!("  {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parish_core::{Entity, StoreConfig};
    use serde_json::json;

    fn seed(store: &Store, value: Value) {
        let map = value.as_object().unwrap().clone();
        store.add(Entity::from_map(map).unwrap()).unwrap();
    }

    #[test]
    fn clean_store_passes() {
        let store = Store::open(StoreConfig::memory()).unwrap();
        seed(
            &store,
            json!({"type_tag": "department", "id": "d-1", "name": "Music"}),
        );
        seed(
            &store,
            json!({
                "type_tag": "member",
                "id": "m-1",
                "first_name": "Ama",
                "last_name": "Mensah",
                "email": "ama@example.com",
                "phone_number": "0244123456",
                "department_id": "d-1",
            }),
        );

        let result = sweep(&store).unwrap();
        assert_eq!(result.records_checked, 2);
        assert!(result.is_ok());
    }

    #[test]
    fn dangling_reference_is_reported() {
        let store = Store::open(StoreConfig::memory()).unwrap();
        seed(
            &store,
            json!({
                "type_tag": "member",
                "id": "m-1",
                "first_name": "Ama",
                "last_name": "Mensah",
                "email": "ama@example.com",
                "phone_number": "0244123456",
                "department_id": "d-404",
            }),
        );

        let result = sweep(&store).unwrap();
        assert_eq!(result.dangling_references, 1);
        assert!(!result.is_ok());
        assert!(result.errors[0].contains("d-404"));
    }

    #[test]
    fn reversed_timestamps_are_reported() {
        let store = Store::open(StoreConfig::memory()).unwrap();
        seed(
            &store,
            json!({
                "type_tag": "role",
                "id": "r-1",
                "name": "usher",
                "created_at": "2026-02-01T00:00:00Z",
                "updated_at": "2026-01-01T00:00:00Z",
            }),
        );

        let result = sweep(&store).unwrap();
        assert_eq!(result.timestamp_issues, 1);
        assert!(!result.is_ok());
    }
}
