use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::{RoleError, RoleResult};

pub const ROLE_NAME_MIN: usize = 3;
pub const ROLE_NAME_MAX: usize = 64;

/// Store-assigned role identifier, always in `1..=i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleId(i32);

impl RoleId {
    pub fn new(id: i64) -> RoleResult<Self> {
        match i32::try_from(id) {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(RoleError::Validation(
                "Role id must be a positive integer".to_string(),
            )),
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trimmed role name of 3 to 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleName(String);

impl RoleName {
    pub fn parse(raw: &str) -> RoleResult<Self> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if !(ROLE_NAME_MIN..=ROLE_NAME_MAX).contains(&len) {
            return Err(RoleError::Validation(format!(
                "Role name must be between {} and {} characters",
                ROLE_NAME_MIN, ROLE_NAME_MAX
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Developer")]
    pub name: String,
}

impl Role {
    pub fn new(id: RoleId, name: RoleName) -> Self {
        Self {
            id: id.get(),
            name: name.into_inner(),
        }
    }
}

/// Request body for creating a role
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRole {
    #[validate(custom(function = "validate_role_name"))]
    #[schema(example = "Developer", min_length = 3, max_length = 64)]
    pub name: String,
}

/// Request body for renaming a role
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateRole {
    #[validate(custom(function = "validate_role_name"))]
    #[schema(example = "Senior Developer", min_length = 3, max_length = 64)]
    pub name: String,
}

/// `validator` hook sharing the [`RoleName`] rule, so the HTTP layer reports
/// the failure per field.
pub fn validate_role_name(name: &str) -> Result<(), ValidationError> {
    RoleName::parse(name).map(|_| ()).map_err(|e| {
        ValidationError::new("role_name").with_message(Cow::Owned(e.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_id_rejects_zero_negative_and_overflow() {
        assert!(RoleId::new(0).is_err());
        assert!(RoleId::new(-3).is_err());
        assert!(RoleId::new(i64::from(i32::MAX) + 1).is_err());
        assert_eq!(RoleId::new(7).unwrap().get(), 7);
    }

    #[test]
    fn role_name_is_trimmed() {
        let name = RoleName::parse("  Developer  ").unwrap();
        assert_eq!(name.as_str(), "Developer");
    }

    #[test]
    fn role_name_length_bounds() {
        assert!(RoleName::parse("ab").is_err());
        assert!(RoleName::parse("   ab   ").is_err());
        assert!(RoleName::parse("abc").is_ok());
        assert!(RoleName::parse(&"x".repeat(64)).is_ok());
        assert!(RoleName::parse(&"x".repeat(65)).is_err());
    }

    #[test]
    fn role_name_counts_characters_not_bytes() {
        assert!(RoleName::parse("Señor").is_ok());
        assert!(RoleName::parse(&"é".repeat(64)).is_ok());
    }

    #[test]
    fn create_role_validation_reports_field() {
        let err = CreateRole { name: "x".into() }.validate().unwrap_err();
        assert!(err.field_errors().contains_key("name"));
    }
}
