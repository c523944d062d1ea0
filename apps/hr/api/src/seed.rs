//! Bootstrap administrator, created through the services so every rule applies.

use domain_employees::{
    CreateEmployee, CredentialHasher, EmployeeError, EmployeeRepository, EmployeeService,
};
use domain_roles::{CreateRole, Role, RoleRepository, RoleService};
use tracing::info;

use crate::config::SeedAdmin;

/// Outcome of [`seed_admin`], mostly for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyPresent,
}

/// Ensures the administrator role and employee exist.
///
/// Safe to run on every start: an existing role is reused and an already
/// registered email is left untouched.
pub async fn seed_admin<E, R, H>(
    seed: &SeedAdmin,
    roles: &RoleService<R>,
    employees: &EmployeeService<E, R, H>,
) -> eyre::Result<SeedOutcome>
where
    E: EmployeeRepository,
    R: RoleRepository,
    H: CredentialHasher,
{
    let role = ensure_role(&seed.role, roles).await?;

    let input = CreateEmployee {
        name: seed.name.clone(),
        email: seed.email.clone(),
        password: seed.password.clone(),
        commute_allowance: 0,
        role_id: role.id.into(),
    };

    match employees.create(input).await {
        Ok(admin) => {
            info!(employee_id = admin.id, role = %role.name, "Seeded administrator");
            Ok(SeedOutcome::Created)
        }
        Err(EmployeeError::DuplicateEmail(_)) => {
            info!("Administrator already present, skipping seed");
            Ok(SeedOutcome::AlreadyPresent)
        }
        Err(e) => Err(eyre::eyre!("failed to seed administrator: {e}")),
    }
}

async fn ensure_role<R: RoleRepository>(name: &str, roles: &RoleService<R>) -> eyre::Result<Role> {
    let existing = roles
        .list()
        .await?
        .into_iter()
        .find(|role| role.name == name.trim());

    match existing {
        Some(role) => Ok(role),
        None => {
            let role = roles
                .create(CreateRole {
                    name: name.to_string(),
                })
                .await?;
            info!(role_id = role.id, "Seeded administrator role");
            Ok(role)
        }
    }
}
