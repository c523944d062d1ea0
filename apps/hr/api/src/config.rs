use axum_helpers::JwtConfig;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_optional, server::ServerConfig};
use database::PostgresConfig;

pub use core_config::Environment;

pub const DEFAULT_ADMIN_NAME: &str = "Administrator";
pub const DEFAULT_ADMIN_ROLE: &str = "Administrator";

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub jwt: JwtConfig,
    /// Bootstrap administrator, when configured
    pub seed: Option<SeedAdmin>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8080
        let database = PostgresConfig::from_env()?; // DATABASE_URL required
        let jwt = JwtConfig::from_env()?; // JWT_SECRET required
        let seed = SeedAdmin::from_env()?;

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            database,
            jwt,
            seed,
        })
    }
}

/// Administrator created at startup so the first login is possible.
///
/// Environment variables:
/// - `HR_SEED_ADMIN_EMAIL` and `HR_SEED_ADMIN_PASSWORD` (both or neither)
/// - `HR_SEED_ADMIN_NAME` (default "Administrator")
/// - `HR_SEED_ADMIN_ROLE` (default "Administrator")
#[derive(Clone, PartialEq, Eq)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

impl SeedAdmin {
    /// `None` when neither the email nor the password is set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let email = env_optional("HR_SEED_ADMIN_EMAIL");
        let password = env_optional("HR_SEED_ADMIN_PASSWORD");

        let (email, password) = match (email, password) {
            (None, None) => return Ok(None),
            (Some(email), Some(password)) => (email, password),
            (Some(_), None) => {
                return Err(ConfigError::MissingEnvVar(
                    "HR_SEED_ADMIN_PASSWORD".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingEnvVar("HR_SEED_ADMIN_EMAIL".to_string()));
            }
        };

        Ok(Some(Self {
            email,
            password,
            name: env_optional("HR_SEED_ADMIN_NAME")
                .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
            role: env_optional("HR_SEED_ADMIN_ROLE")
                .unwrap_or_else(|| DEFAULT_ADMIN_ROLE.to_string()),
        }))
    }
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED_VARS: [&str; 4] = [
        "HR_SEED_ADMIN_EMAIL",
        "HR_SEED_ADMIN_PASSWORD",
        "HR_SEED_ADMIN_NAME",
        "HR_SEED_ADMIN_ROLE",
    ];

    fn unset_seed() -> Vec<(&'static str, Option<&'static str>)> {
        SEED_VARS.iter().map(|k| (*k, None)).collect()
    }

    #[test]
    fn test_config_from_env() {
        let mut vars = unset_seed();
        vars.extend([
            ("APP_ENV", Some("production")),
            ("PORT", Some("3000")),
            ("DATABASE_URL", Some("postgresql://localhost/hr")),
            ("JWT_SECRET", Some("config-test-secret-0123456789abcdef")),
            ("JWT_TTL_SECS", None),
        ]);

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert!(config.environment.is_production());
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.jwt.ttl_secs, 3600);
            assert_eq!(config.app.name, "hr_api");
            assert!(config.seed.is_none());
        });
    }

    #[test]
    fn test_config_requires_jwt_secret() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/hr")),
                ("JWT_SECRET", None),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_SECRET"));
            },
        );
    }

    #[test]
    fn test_seed_admin_defaults() {
        let mut vars = unset_seed();
        vars[0].1 = Some("admin@example.com");
        vars[1].1 = Some("Admin@123");

        temp_env::with_vars(vars, || {
            let seed = SeedAdmin::from_env().unwrap().unwrap();
            assert_eq!(seed.email, "admin@example.com");
            assert_eq!(seed.name, DEFAULT_ADMIN_NAME);
            assert_eq!(seed.role, DEFAULT_ADMIN_ROLE);
            assert!(!format!("{seed:?}").contains("Admin@123"));
        });
    }

    #[test]
    fn test_seed_admin_needs_both_email_and_password() {
        let mut vars = unset_seed();
        vars[0].1 = Some("admin@example.com");

        temp_env::with_vars(vars, || {
            let err = SeedAdmin::from_env().unwrap_err();
            assert!(err.to_string().contains("HR_SEED_ADMIN_PASSWORD"));
        });
    }
}
