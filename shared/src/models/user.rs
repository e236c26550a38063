//! User roles

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ParseEnumError;

/// Warehouse user roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    WarehouseStaff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::WarehouseStaff => "warehouse_staff",
        }
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "manager" => Ok(UserRole::Manager),
            "warehouse_staff" => Ok(UserRole::WarehouseStaff),
            other => Err(ParseEnumError {
                kind: "user role",
                value: other.to_string(),
            }),
        }
    }
}
