//! Organization and admin identity produced by provisioning

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub schema_name: String,
}

/// Admin account created with the organization. The password is the one we
/// sent; the service never echoes it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Everything needed to act on behalf of a freshly provisioned organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityContext {
    pub organization: Organization,
    pub admin: AdminUser,
}
