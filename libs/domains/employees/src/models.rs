use domain_roles::{Role, RoleId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::{EmployeeError, EmployeeResult};

pub const EMPLOYEE_NAME_MIN: usize = 3;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

// Value objects

/// Store-assigned employee identifier, always in `1..=i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmployeeId(i32);

impl EmployeeId {
    pub fn new(id: i64) -> EmployeeResult<Self> {
        match i32::try_from(id) {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(EmployeeError::Validation(
                "Employee id must be a positive integer".to_string(),
            )),
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trimmed display name of at least 3 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeName(String);

impl EmployeeName {
    pub fn parse(raw: &str) -> EmployeeResult<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < EMPLOYEE_NAME_MIN {
            return Err(EmployeeError::Validation(format!(
                "Name must be at least {} characters",
                EMPLOYEE_NAME_MIN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trimmed, lower-cased address of the form `local@domain.tld`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> EmployeeResult<Self> {
        let normalized = raw.trim().to_lowercase();
        if !EMAIL_SHAPE.is_match(&normalized) {
            return Err(EmployeeError::Validation(
                "Email must be a valid address".to_string(),
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plaintext password that meets the policy. Only lives until it is hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn parse(raw: &str) -> EmployeeResult<Self> {
        let violation = if raw.chars().count() < PASSWORD_MIN {
            Some(format!(
                "Password must be at least {} characters",
                PASSWORD_MIN
            ))
        } else if !raw.chars().any(|c| c.is_ascii_uppercase()) {
            Some("Password must contain at least one uppercase letter".to_string())
        } else if !raw.chars().any(|c| c.is_ascii_digit()) {
            Some("Password must contain at least one digit".to_string())
        } else if !raw.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
            Some(format!(
                "Password must contain at least one special character ({})",
                PASSWORD_SPECIAL_CHARS
            ))
        } else {
            None
        };

        match violation {
            Some(message) => Err(EmployeeError::Validation(message)),
            None => Ok(Self(raw.to_string())),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// Whether the employee commutes on the transport allowance, stored as 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommuteAllowance(bool);

impl CommuteAllowance {
    pub fn new(value: i64) -> EmployeeResult<Self> {
        match value {
            0 => Ok(Self(false)),
            1 => Ok(Self(true)),
            _ => Err(EmployeeError::Validation(
                "Commute allowance must be 0 or 1".to_string(),
            )),
        }
    }

    pub fn as_i16(self) -> i16 {
        i16::from(self.0)
    }
}

// Repository inputs

/// Fully validated employee ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: EmployeeName,
    pub email: Email,
    pub password_hash: String,
    pub commute_allowance: CommuteAllowance,
    pub role_id: RoleId,
}

/// Validated partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeChanges {
    pub name: Option<EmployeeName>,
    pub email: Option<Email>,
    pub password_hash: Option<String>,
    pub commute_allowance: Option<CommuteAllowance>,
    pub role_id: Option<RoleId>,
}

// Read models

/// Employee joined with its role. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "John Smith")]
    pub name: String,
    #[schema(example = "john@x.com")]
    pub email: String,
    /// 0 or 1
    #[schema(example = 1)]
    pub commute_allowance: i16,
    pub role: Role,
}

/// Lookup result used for login and uniqueness checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeCredentials {
    pub employee: EmployeeView,
    pub password_hash: String,
}

// Request and response bodies

/// Request body for creating an employee
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    #[validate(custom(function = "validate_employee_name"))]
    #[schema(example = "John Smith")]
    pub name: String,
    #[validate(custom(function = "validate_email_address"))]
    #[schema(example = "john@x.com")]
    pub email: String,
    #[validate(custom(function = "validate_password_policy"))]
    #[schema(example = "Pass@123", format = Password)]
    pub password: String,
    #[validate(range(min = 0, max = 1, message = "Commute allowance must be 0 or 1"))]
    #[schema(example = 1, minimum = 0, maximum = 1)]
    pub commute_allowance: i64,
    #[validate(range(min = 1, max = 2147483647, message = "Role id must be a positive integer"))]
    #[schema(example = 1, minimum = 1)]
    pub role_id: i64,
}

/// Request body for updating an employee; at least one field is required
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    #[validate(custom(function = "validate_employee_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_email_address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_password_policy"))]
    #[schema(format = Password)]
    pub password: Option<String>,
    #[validate(range(min = 0, max = 1, message = "Commute allowance must be 0 or 1"))]
    pub commute_allowance: Option<i64>,
    #[validate(range(min = 1, max = 2147483647, message = "Role id must be a positive integer"))]
    pub role_id: Option<i64>,
}

impl UpdateEmployee {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.commute_allowance.is_none()
            && self.role_id.is_none()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_email_address"))]
    #[schema(example = "john@x.com")]
    pub email: String,
    #[validate(custom(function = "validate_password_policy"))]
    #[schema(example = "Pass@123", format = Password)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: EmployeeView,
    /// Bearer token; send it back as `Authorization: Bearer <token>`
    pub token: String,
}

// `validator` hooks sharing the value-object rules

fn field_error(code: &'static str, err: EmployeeError) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(err.to_string()))
}

pub fn validate_employee_name(name: &str) -> Result<(), ValidationError> {
    EmployeeName::parse(name)
        .map(|_| ())
        .map_err(|e| field_error("employee_name", e))
}

pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    Email::parse(email)
        .map(|_| ())
        .map_err(|e| field_error("email", e))
}

pub fn validate_password_policy(password: &str) -> Result<(), ValidationError> {
    Password::parse(password)
        .map(|_| ())
        .map_err(|e| field_error("password_policy", e))
}
