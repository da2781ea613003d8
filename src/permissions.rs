// ABOUTME: Role-based permission system with a single declared role table
// ABOUTME: Resolves roles to permission sets and implements the Admin bypass rule
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! # Role-Based Permissions
//!
//! Maps a [`Role`] to its set of [`Permission`]s and answers containment
//! queries. The table has one source of truth: the built-in defaults, or a
//! JSON override loaded at startup. The `Admin` role satisfies every
//! permission check regardless of its explicit set. Unknown role names
//! resolve to the empty set, so checks fail closed.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

/// User role within the congregation's staff hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full administrative access; bypasses all permission checks
    Admin,
    /// Pastoral staff
    Pastor,
    /// Financial officer
    Treasurer,
    /// Office administration
    Secretary,
    /// Regular congregation member
    Member,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Admin => "Admin",
            Self::Pastor => "Pastor",
            Self::Treasurer => "Treasurer",
            Self::Secretary => "Secretary",
            Self::Member => "Member",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "pastor" => Ok(Self::Pastor),
            "treasurer" => Ok(Self::Treasurer),
            "secretary" => Ok(Self::Secretary),
            "member" => Ok(Self::Member),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// A named capability required to perform an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Assign and change user roles
    ManageRoles,
    /// Create and edit member records
    ManageMembers,
    /// Read member records
    ViewMembers,
    /// Create and edit family records
    ManageFamilies,
    /// Create and edit budgets
    ManageBudgets,
    /// Record expenses against budgets
    RecordExpenses,
    /// Read financial reports
    ViewFinancialReports,
    /// Open and close fiscal years
    ManageFiscalYears,
    /// Create and edit events
    ManageEvents,
    /// Read the event calendar
    ViewEvents,
    /// Create and edit groups
    ManageGroups,
    /// Manage volunteer assignments
    ManageVolunteers,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            Self::ManageRoles => "manage_roles",
            Self::ManageMembers => "manage_members",
            Self::ViewMembers => "view_members",
            Self::ManageFamilies => "manage_families",
            Self::ManageBudgets => "manage_budgets",
            Self::RecordExpenses => "record_expenses",
            Self::ViewFinancialReports => "view_financial_reports",
            Self::ManageFiscalYears => "manage_fiscal_years",
            Self::ManageEvents => "manage_events",
            Self::ViewEvents => "view_events",
            Self::ManageGroups => "manage_groups",
            Self::ManageVolunteers => "manage_volunteers",
        };
        write!(f, "{key}")
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manage_roles" => Ok(Self::ManageRoles),
            "manage_members" => Ok(Self::ManageMembers),
            "view_members" => Ok(Self::ViewMembers),
            "manage_families" => Ok(Self::ManageFamilies),
            "manage_budgets" => Ok(Self::ManageBudgets),
            "record_expenses" => Ok(Self::RecordExpenses),
            "view_financial_reports" => Ok(Self::ViewFinancialReports),
            "manage_fiscal_years" => Ok(Self::ManageFiscalYears),
            "manage_events" => Ok(Self::ManageEvents),
            "view_events" => Ok(Self::ViewEvents),
            "manage_groups" => Ok(Self::ManageGroups),
            "manage_volunteers" => Ok(Self::ManageVolunteers),
            other => Err(format!("Unknown permission: {other}")),
        }
    }
}

/// Role table type: each role's explicitly granted permissions
pub type RoleTable = HashMap<Role, HashSet<Permission>>;

/// The built-in role table used when no override is configured
#[must_use]
pub fn default_role_table() -> RoleTable {
    use Permission::{
        ManageBudgets, ManageEvents, ManageFamilies, ManageFiscalYears, ManageGroups,
        ManageMembers, ManageRoles, ManageVolunteers, RecordExpenses, ViewEvents,
        ViewFinancialReports, ViewMembers,
    };

    let mut table = RoleTable::new();
    // Admin's explicit set exists for introspection only; checks bypass it
    table.insert(
        Role::Admin,
        [ManageRoles, ManageMembers, ViewMembers].into(),
    );
    table.insert(
        Role::Pastor,
        [
            ManageMembers,
            ViewMembers,
            ManageFamilies,
            ViewFinancialReports,
            ManageEvents,
            ViewEvents,
            ManageGroups,
            ManageVolunteers,
        ]
        .into(),
    );
    table.insert(
        Role::Treasurer,
        [
            ViewMembers,
            ManageBudgets,
            RecordExpenses,
            ViewFinancialReports,
            ManageFiscalYears,
        ]
        .into(),
    );
    table.insert(
        Role::Secretary,
        [
            ManageMembers,
            ViewMembers,
            ManageFamilies,
            ManageEvents,
            ViewEvents,
            ManageGroups,
        ]
        .into(),
    );
    table.insert(Role::Member, [ViewEvents].into());
    table
}

/// Resolves roles to permission sets
///
/// Pure and side-effect free on the hot path; the table lives behind an
/// `RwLock` only so [`PermissionResolver::reload`] can swap it without a
/// restart when the upstream role mapping changes.
pub struct PermissionResolver {
    table: RwLock<RoleTable>,
}

impl PermissionResolver {
    /// Create a resolver over an explicit role table
    #[must_use]
    pub fn new(table: RoleTable) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }

    /// Create a resolver over the built-in default table
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(default_role_table())
    }

    /// Parse a role table from its JSON representation
    ///
    /// # Errors
    /// Returns an error if the JSON does not describe a `role -> [permission]` map
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let table: RoleTable = serde_json::from_str(json)?;
        Ok(Self::new(table))
    }

    /// Replace the role table (hot-reload hook)
    pub fn reload(&self, table: RoleTable) {
        *self
            .table
            .write()
            .unwrap_or_else(PoisonError::into_inner) = table;
    }

    /// The explicit permission set for a role name.
    ///
    /// Unknown role names resolve to the empty set.
    #[must_use]
    pub fn permissions_for(&self, role: &str) -> HashSet<Permission> {
        let Ok(role) = Role::from_str(role) else {
            return HashSet::new();
        };
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&role)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether `role` holds `permission`.
    ///
    /// `Admin` satisfies every permission unconditionally.
    #[must_use]
    pub fn has_permission(&self, role: &str, permission: Permission) -> bool {
        if Role::from_str(role) == Ok(Role::Admin) {
            return true;
        }
        self.permissions_for(role).contains(&permission)
    }

    /// Whether `role` holds at least one of `permissions`
    #[must_use]
    pub fn has_any(&self, role: &str, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(role, *p))
    }

    /// Whether `role` holds all of `permissions`
    #[must_use]
    pub fn has_all(&self, role: &str, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.has_permission(role, *p))
    }
}
