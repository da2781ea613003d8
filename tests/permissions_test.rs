// ABOUTME: Tests the role table, Admin bypass, and permission containment queries
// ABOUTME: Covers the default table plus JSON overrides and hot reload
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use flock_server::permissions::{default_role_table, Permission, PermissionResolver, Role};

const ALL_PERMISSIONS: [Permission; 12] = [
    Permission::ManageRoles,
    Permission::ManageMembers,
    Permission::ViewMembers,
    Permission::ManageFamilies,
    Permission::ManageBudgets,
    Permission::RecordExpenses,
    Permission::ViewFinancialReports,
    Permission::ManageFiscalYears,
    Permission::ManageEvents,
    Permission::ViewEvents,
    Permission::ManageGroups,
    Permission::ManageVolunteers,
];

#[test]
fn test_admin_bypasses_every_permission() {
    let resolver = PermissionResolver::with_defaults();
    for permission in ALL_PERMISSIONS {
        assert!(
            resolver.has_permission("Admin", permission),
            "Admin must hold {permission}"
        );
    }
}

#[test]
fn test_default_table_role_grants() {
    let resolver = PermissionResolver::with_defaults();

    // Pastor: financial visibility but no role management
    assert!(resolver.has_permission("Pastor", Permission::ViewFinancialReports));
    assert!(resolver.has_permission("Pastor", Permission::ManageMembers));
    assert!(!resolver.has_permission("Pastor", Permission::ManageRoles));

    // Treasurer: money, not membership management
    assert!(resolver.has_permission("Treasurer", Permission::ManageBudgets));
    assert!(resolver.has_permission("Treasurer", Permission::RecordExpenses));
    assert!(!resolver.has_permission("Treasurer", Permission::ManageMembers));

    // Member: calendar only
    assert!(resolver.has_permission("Member", Permission::ViewEvents));
    assert!(!resolver.has_permission("Member", Permission::ManageRoles));
    assert!(!resolver.has_permission("Member", Permission::ViewFinancialReports));
}

#[test]
fn test_role_lookup_is_case_insensitive() {
    let resolver = PermissionResolver::with_defaults();
    assert!(resolver.has_permission("pastor", Permission::ViewFinancialReports));
    assert!(resolver.has_permission("ADMIN", Permission::ManageRoles));
}

#[test]
fn test_unknown_role_fails_closed() {
    let resolver = PermissionResolver::with_defaults();
    assert!(resolver.permissions_for("deacon").is_empty());
    for permission in ALL_PERMISSIONS {
        assert!(!resolver.has_permission("deacon", permission));
    }
}

#[test]
fn test_has_any_and_has_all() {
    let resolver = PermissionResolver::with_defaults();
    let financial = [Permission::ManageBudgets, Permission::ViewFinancialReports];

    assert!(resolver.has_all("Treasurer", &financial));
    assert!(resolver.has_any("Pastor", &financial));
    assert!(!resolver.has_all("Pastor", &financial));
    assert!(!resolver.has_any("Member", &financial));

    // Admin bypass flows through the derived checks
    assert!(resolver.has_all("Admin", &ALL_PERMISSIONS));
}

#[test]
fn test_json_override_replaces_default_grants() {
    let json = r#"{
        "Member": ["view_events", "view_members"],
        "Secretary": ["manage_events"]
    }"#;
    let resolver = PermissionResolver::from_json(json).unwrap();

    assert!(resolver.has_permission("Member", Permission::ViewMembers));
    assert!(resolver.has_permission("Secretary", Permission::ManageEvents));
    // Roles absent from the override hold nothing explicitly
    assert!(resolver.permissions_for("Pastor").is_empty());
    // Admin bypass is independent of the table
    assert!(resolver.has_permission("Admin", Permission::ManageRoles));
}

#[test]
fn test_malformed_override_is_rejected() {
    assert!(PermissionResolver::from_json("{\"Member\": [\"fly\"]}").is_err());
    assert!(PermissionResolver::from_json("{\"Deacon\": []}").is_err());
    assert!(PermissionResolver::from_json("not json").is_err());
}

#[test]
fn test_reload_applies_new_table() {
    let resolver = PermissionResolver::with_defaults();
    assert!(!resolver.has_permission("Member", Permission::ViewMembers));

    let mut table = default_role_table();
    table
        .entry(Role::Member)
        .or_default()
        .insert(Permission::ViewMembers);
    resolver.reload(table);

    assert!(resolver.has_permission("Member", Permission::ViewMembers));
}
