//! Parish Administration Example
//!
//! Walks a Sunday of church record keeping through the service layer:
//! - Opening a store and registering the first admin account
//! - Signing in and resolving bearer tokens
//! - Setting up departments, groups, members, and an event
//! - Marking attendance and recording the day's finances
//! - Role gating as seen from a member-role account
//!
//! Run with: cargo run -p parish_day

use parish_api::{AttendanceSearch, LoginRequest, RegisterRequest, Service};
use parish_core::model::{AttendanceStatus, UserRole};
use parish_core::{FieldMap, Kind, Store, StoreConfig};
use serde_json::{json, Value};
use std::sync::Arc;

fn body(value: Value) -> FieldMap {
    value.as_object().expect("demo bodies are objects").clone()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Parish Administration Example");
    println!("=============================\n");

    let store = Arc::new(Store::open(StoreConfig::memory())?);
    let service = Service::new(Arc::clone(&store), b"demo-secret".to_vec());
    println!("[OK] Store opened ({})", store.config().describe());

    // ========================================================================
    // Register the administrator and sign in
    // ========================================================================
    println!("\n[+] Registering the administrator...");
    service.register(RegisterRequest {
        username: "church_admin".to_string(),
        email: "admin@stpeters.example".to_string(),
        password: "a demo passphrase".to_string(),
        role: Some(UserRole::Admin),
        member_id: None,
        first_name: Some("Esi".to_string()),
        last_name: Some("Owusu".to_string()),
        phone_number: None,
    })?;

    let session = service.login(&LoginRequest {
        identifier: "church_admin".to_string(),
        password: "a demo passphrase".to_string(),
    })?;
    let admin = service.verify_token(&session.token)?;
    println!("[OK] Signed in as church_admin, role {}", admin.role);

    // ========================================================================
    // Departments and groups
    // ========================================================================
    println!("\n[+] Setting up departments and groups...");
    let music = service.create_department(
        &admin,
        body(json!({
            "name": "Music",
            "description": "Choirs, band, and sound",
        })),
    )?;
    service.create_department(
        &admin,
        body(json!({
            "name": "Ushering",
            "description": "Welcome and seating",
        })),
    )?;
    let choir = service.create_group(
        &admin,
        body(json!({
            "name": "Youth Choir",
            "description": "Saturday rehearsals, Sunday second service",
            "department_id": music["id"],
        })),
    )?;
    println!(
        "[OK] {} departments, {} group",
        store.count(Some(Kind::Department)),
        store.count(Some(Kind::Group))
    );

    // ========================================================================
    // Enroll members into the choir
    // ========================================================================
    println!("\n[+] Enrolling members...");
    let roster = [
        ("Ama", "Mensah", "ama@stpeters.example", "0244123456"),
        ("Kofi", "Boateng", "kofi@stpeters.example", "0244765432"),
        ("Afia", "Asante", "afia@stpeters.example", "0209876543"),
    ];
    let mut member_ids = Vec::new();
    for (first, last, email, phone) in roster {
        let member = service.create_member(
            &admin,
            body(json!({
                "first_name": first,
                "last_name": last,
                "email": email,
                "phone_number": phone,
                "group_id": choir["id"],
            })),
        )?;
        member_ids.push(member["id"].as_str().unwrap_or_default().to_string());
    }
    println!("[OK] {} members enrolled", member_ids.len());

    // ========================================================================
    // Sunday service and attendance
    // ========================================================================
    println!("\n[+] Scheduling the Harvest Service...");
    let harvest = service.create_event(
        &admin,
        body(json!({
            "name": "Harvest Service",
            "start_date": "2026-09-06",
            "start_time": "09:00:00",
            "location": "Main auditorium",
            "event_type": "service",
        })),
    )?;

    println!("[~] Marking attendance...");
    for (index, member_id) in member_ids.iter().enumerate() {
        let status = if index == 2 { "absent" } else { "present" };
        service.create_attendance(
            &admin,
            body(json!({
                "member_id": member_id,
                "event_id": harvest["id"],
                "date": "2026-09-06",
                "status": status,
            })),
        )?;
    }

    let present = service.search_attendance(
        &admin,
        &AttendanceSearch {
            event_id: harvest["id"].as_str().map(String::from),
            status: Some(AttendanceStatus::Present),
            ..AttendanceSearch::default()
        },
    )?;
    println!("[OK] {} of {} marked present", present.len(), member_ids.len());

    // ========================================================================
    // The day's finances
    // ========================================================================
    println!("\n[+] Recording the day's finances...");
    for record in [
        json!({
            "type": "income",
            "amount": 1820.50,
            "description": "Harvest offering",
            "category": "offering",
            "event_id": harvest["id"],
            "date": "2026-09-06",
        }),
        json!({
            "type": "income",
            "amount": 640.00,
            "description": "Tithes",
            "category": "tithe",
            "date": "2026-09-06",
        }),
        json!({
            "type": "expense",
            "amount": 230.00,
            "description": "Generator fuel",
            "category": "utilities",
            "event_id": harvest["id"],
            "date": "2026-09-06",
        }),
    ] {
        service.create_finance(&admin, body(record))?;
    }

    let mut income = 0.0;
    let mut expenses = 0.0;
    for record in service.list_finances(&admin)? {
        let amount = record["amount"].as_f64().unwrap_or(0.0);
        if record["type"] == json!("income") {
            income += amount;
        } else {
            expenses += amount;
        }
    }
    println!(
        "[#] Income {income:.2}, expenses {expenses:.2}, net {:.2}",
        income - expenses
    );

    // ========================================================================
    // A member account sees a narrower world
    // ========================================================================
    println!("\n[+] Ama registers her own account...");
    service.register(RegisterRequest {
        username: "amamensah".to_string(),
        email: "ama.m@stpeters.example".to_string(),
        password: "another passphrase".to_string(),
        role: None,
        member_id: Some(member_ids[0].clone()),
        first_name: Some("Ama".to_string()),
        last_name: Some("Mensah".to_string()),
        phone_number: None,
    })?;
    let session = service.login(&LoginRequest {
        identifier: "amamensah".to_string(),
        password: "another passphrase".to_string(),
    })?;
    let ama = service.verify_token(&session.token)?;

    let own = service.get_member(&ama, &member_ids[0])?;
    println!(
        "[OK] Ama reads her own record: {} {}",
        own["first_name"].as_str().unwrap_or("?"),
        own["last_name"].as_str().unwrap_or("?")
    );
    match service.list_finances(&ama) {
        Err(err) => println!("[!] And is turned away from finances: {err}"),
        Ok(_) => println!("[!] Finances were unexpectedly open"),
    }

    // ========================================================================
    // Summary and shutdown
    // ========================================================================
    println!("\n[#] Store contents:");
    for kind in Kind::ALL {
        let count = store.count(Some(kind));
        if count > 0 {
            println!("    {:<18} {}", kind.tag(), count);
        }
    }

    store.shutdown()?;
    println!("\n[*] Store shut down");
    Ok(())
}
