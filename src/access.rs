//! Role resolution and access control
//!
//! An identity supplied by the upstream identity provider is resolved to a
//! single [`Role`] once per request. What each role may do is decided by one
//! static policy table, built on first use and shared by the whole process.

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::error::ServiceError;

/// Access levels, highest privilege first
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Operator,
    WarehouseStaff,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Operator => "operator",
            Role::WarehouseStaff => "warehouse_staff",
            Role::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group names checked in priority order; first match wins
pub const GROUP_PRIORITY: [(&str, Role); 4] = [
    ("administrators", Role::Admin),
    ("managers", Role::Manager),
    ("operators", Role::Operator),
    ("warehouse_staff", Role::WarehouseStaff),
];

/// Authenticated-user record as provided by the identity provider
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    /// `None` for unauthenticated requests
    pub username: Option<String>,
    pub groups: Vec<String>,
    pub is_superuser: bool,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(username: impl Into<String>, groups: &[&str]) -> Self {
        Self {
            username: Some(username.into()),
            groups: groups.iter().map(|g| g.to_string()).collect(),
            is_superuser: false,
        }
    }

    pub fn superuser(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            groups: Vec::new(),
            is_superuser: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }
}

/// Resolve an identity to exactly one role
pub fn resolve_role(identity: &Identity) -> Role {
    if !identity.is_authenticated() {
        return Role::Guest;
    }
    if identity.is_superuser {
        return Role::Admin;
    }

    GROUP_PRIORITY
        .iter()
        .find(|(group, _)| identity.groups.iter().any(|g| g.as_str() == *group))
        .map(|(_, role)| *role)
        .unwrap_or(Role::Guest)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    ViewDashboard,
    ListOrders,
    CreateOrder,
    ViewOrder,
    UpdateOrderStatus,
    ScanBarcode,
    AddNote,
    UploadImage,
    DeleteOrder,
    ViewProducts,
    ManageProducts,
    DeleteProduct,
    ViewInventory,
    ManageInventory,
    ScanSample,
}

impl Operation {
    pub fn describe(&self) -> &'static str {
        match self {
            Operation::ViewDashboard => "view the dashboard",
            Operation::ListOrders => "list orders",
            Operation::CreateOrder => "create orders",
            Operation::ViewOrder => "view orders",
            Operation::UpdateOrderStatus => "update order status",
            Operation::ScanBarcode => "scan order barcodes",
            Operation::AddNote => "add order notes",
            Operation::UploadImage => "upload order images",
            Operation::DeleteOrder => "delete orders",
            Operation::ViewProducts => "view products",
            Operation::ManageProducts => "manage products",
            Operation::DeleteProduct => "delete products",
            Operation::ViewInventory => "view inventory",
            Operation::ManageInventory => "manage inventory",
            Operation::ScanSample => "scan inventory samples",
        }
    }
}

/// Outcome of a policy lookup
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// Allowed, restricted to records the viewer created
    OwnOnly,
    Deny,
}

fn grant(
    policy: &mut HashMap<(Role, Operation), Access>,
    operation: Operation,
    grants: &[(Role, Access)],
) {
    for (role, access) in grants {
        policy.insert((*role, operation), *access);
    }
}

fn build_policy() -> HashMap<(Role, Operation), Access> {
    use Access::{Allow, OwnOnly};
    use Operation::*;
    use Role::*;

    let mut policy = HashMap::new();
    let p = &mut policy;

    grant(p, ViewDashboard, &[(Admin, Allow), (Manager, Allow), (Operator, Allow), (WarehouseStaff, Allow)]);
    grant(p, ListOrders, &[(Admin, Allow), (Manager, Allow), (Operator, Allow), (WarehouseStaff, OwnOnly)]);
    grant(p, CreateOrder, &[(Admin, Allow), (Manager, Allow), (Operator, Allow)]);
    grant(p, ViewOrder, &[(Admin, Allow), (Manager, Allow), (Operator, Allow), (WarehouseStaff, OwnOnly)]);
    grant(p, UpdateOrderStatus, &[(Admin, Allow), (Manager, Allow)]);
    grant(p, ScanBarcode, &[(Admin, Allow), (Manager, Allow), (Operator, Allow), (WarehouseStaff, OwnOnly)]);
    grant(p, AddNote, &[(Admin, Allow), (Manager, Allow)]);
    grant(p, UploadImage, &[(Admin, Allow), (Manager, Allow), (Operator, Allow)]);
    grant(p, DeleteOrder, &[(Admin, Allow)]);
    grant(p, ViewProducts, &[(Admin, Allow), (Manager, Allow), (Operator, Allow), (WarehouseStaff, Allow)]);
    grant(p, ManageProducts, &[(Admin, Allow), (Manager, Allow)]);
    grant(p, DeleteProduct, &[(Admin, Allow)]);
    grant(p, ViewInventory, &[(Admin, Allow), (Manager, Allow), (Operator, Allow), (WarehouseStaff, Allow)]);
    grant(p, ManageInventory, &[(Admin, Allow), (Manager, Allow), (Operator, Allow)]);
    grant(p, ScanSample, &[(Admin, Allow), (Manager, Allow), (Operator, Allow), (WarehouseStaff, Allow)]);

    policy
}

lazy_static! {
    static ref POLICY: HashMap<(Role, Operation), Access> = build_policy();
}

/// Look up the policy table; anything not granted is denied
pub fn access_for(role: Role, operation: Operation) -> Access {
    POLICY
        .get(&(role, operation))
        .copied()
        .unwrap_or(Access::Deny)
}

/// The caller of a service operation: identity plus its resolved role
#[derive(Clone, Debug)]
pub struct Viewer {
    identity: Identity,
    role: Role,
}

impl Viewer {
    pub fn new(identity: Identity) -> Self {
        let role = resolve_role(&identity);
        Self { identity, role }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Actor name recorded in audit entries
    pub fn actor(&self) -> Option<&str> {
        self.identity.username.as_deref()
    }

    /// Name stored as a record's creator. Only guests lack a username, and
    /// guests are denied every operation that creates records.
    pub fn creator(&self) -> String {
        self.actor().unwrap_or("anonymous").to_string()
    }

    /// Fail with `PermissionDenied` unless the policy grants `operation`
    pub fn authorize(&self, operation: Operation) -> Result<Access, ServiceError> {
        match access_for(self.role, operation) {
            Access::Deny => Err(ServiceError::PermissionDenied(format!(
                "Role '{}' may not {}",
                self.role,
                operation.describe()
            ))),
            granted => Ok(granted),
        }
    }

    /// Whether a record created by `created_by` is visible under `access`
    pub fn can_see(&self, access: Access, created_by: &str) -> bool {
        match access {
            Access::Allow => true,
            Access::OwnOnly => self.actor() == Some(created_by),
            Access::Deny => false,
        }
    }
}
