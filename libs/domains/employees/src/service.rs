use axum_helpers::{TokenService, TokenSubject};
use domain_roles::{RoleId, RoleRepository, RoleService};
use std::sync::Arc;

use crate::error::{EmployeeError, EmployeeResult};
use crate::hasher::{CredentialHasher, DECOY_DIGEST};
use crate::models::{
    CommuteAllowance, CreateEmployee, Email, EmployeeChanges, EmployeeId, EmployeeName,
    EmployeeView, LoginRequest, LoginResponse, NewEmployee, Password, UpdateEmployee,
};
use crate::repository::EmployeeRepository;

/// Service layer for Employee business logic and login
pub struct EmployeeService<E, R, H>
where
    E: EmployeeRepository,
    R: RoleRepository,
    H: CredentialHasher,
{
    repository: Arc<E>,
    roles: RoleService<R>,
    hasher: Arc<H>,
    tokens: TokenService,
}

impl<E, R, H> EmployeeService<E, R, H>
where
    E: EmployeeRepository,
    R: RoleRepository,
    H: CredentialHasher,
{
    pub fn new(repository: E, roles: RoleService<R>, hasher: H, tokens: TokenService) -> Self {
        Self {
            repository: Arc::new(repository),
            roles,
            hasher: Arc::new(hasher),
            tokens,
        }
    }

    /// Create an employee.
    ///
    /// Every field is validated first, then the role must exist and the
    /// email must be free, in that order. The password is hashed before it
    /// reaches the repository.
    pub async fn create(&self, input: CreateEmployee) -> EmployeeResult<EmployeeView> {
        let role_id = RoleId::new(input.role_id)?;
        let name = EmployeeName::parse(&input.name)?;
        let email = Email::parse(&input.email)?;
        let password = Password::parse(&input.password)?;
        let commute_allowance = CommuteAllowance::new(input.commute_allowance)?;

        self.ensure_role_exists(role_id).await?;

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(EmployeeError::DuplicateEmail(email.to_string()));
        }

        let password_hash = self.hasher.hash(&password).await?;

        self.repository
            .create(NewEmployee {
                name,
                email,
                password_hash,
                commute_allowance,
                role_id,
            })
            .await
    }

    /// Exchange credentials for a token.
    ///
    /// An unknown email and a wrong password fail the same way.
    pub async fn login(&self, input: LoginRequest) -> EmployeeResult<LoginResponse> {
        let email = Email::parse(&input.email)?;
        let password = Password::parse(&input.password)?;

        let Some(credentials) = self.repository.find_by_email(&email).await? else {
            tracing::debug!("login for unknown email");
            let _ = self.hasher.verify(password.expose(), DECOY_DIGEST).await;
            return Err(EmployeeError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify(password.expose(), &credentials.password_hash)
            .await?
        {
            tracing::debug!(employee_id = credentials.employee.id, "login with wrong password");
            return Err(EmployeeError::InvalidCredentials);
        }

        let user = credentials.employee;
        let token = self.tokens.issue(&TokenSubject {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.name.clone(),
        })?;

        tracing::info!(employee_id = user.id, "Employee logged in");
        Ok(LoginResponse { user, token })
    }

    pub async fn find_all(&self) -> EmployeeResult<Vec<EmployeeView>> {
        self.repository.list().await
    }

    pub async fn find_by_id(&self, id: i32) -> EmployeeResult<EmployeeView> {
        let employee_id = EmployeeId::new(id.into())?;
        self.repository
            .get_by_id(employee_id)
            .await?
            .ok_or(EmployeeError::NotFound(id))
    }

    /// Apply a partial update. Returns `false` when the id matched nothing.
    ///
    /// A new role must exist and a new email must not belong to another
    /// employee; a new password is re-hashed.
    pub async fn update(&self, id: i32, input: UpdateEmployee) -> EmployeeResult<bool> {
        let employee_id = EmployeeId::new(id.into())?;
        if input.is_empty() {
            return Err(EmployeeError::Validation(
                "At least one field must be provided".to_string(),
            ));
        }

        let role_id = input.role_id.map(RoleId::new).transpose()?;
        let name = input.name.as_deref().map(EmployeeName::parse).transpose()?;
        let email = input.email.as_deref().map(Email::parse).transpose()?;
        let password = input.password.as_deref().map(Password::parse).transpose()?;
        let commute_allowance = input
            .commute_allowance
            .map(CommuteAllowance::new)
            .transpose()?;

        if let Some(role_id) = role_id {
            self.ensure_role_exists(role_id).await?;
        }

        if let Some(email) = &email {
            if let Some(owner) = self.repository.find_by_email(email).await? {
                if owner.employee.id != id {
                    return Err(EmployeeError::DuplicateEmail(email.to_string()));
                }
            }
        }

        let password_hash = match &password {
            Some(password) => Some(self.hasher.hash(password).await?),
            None => None,
        };

        self.repository
            .update(
                employee_id,
                EmployeeChanges {
                    name,
                    email,
                    password_hash,
                    commute_allowance,
                    role_id,
                },
            )
            .await
    }

    /// Returns `false` when the id matched nothing.
    pub async fn delete(&self, id: i32) -> EmployeeResult<bool> {
        let employee_id = EmployeeId::new(id.into())?;
        self.repository.delete(employee_id).await
    }

    async fn ensure_role_exists(&self, role_id: RoleId) -> EmployeeResult<()> {
        match self.roles.find(role_id).await? {
            Some(_) => Ok(()),
            None => Err(EmployeeError::RoleNotFound),
        }
    }
}
