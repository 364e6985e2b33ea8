use config::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    #[serde(default)]
    pub credentials: CredentialSettings,
    /// Absent means accounts are kept in process memory
    pub database: Option<DatabaseSettings>,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

/// Token signing settings
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    /// Value written into the `expiresAt` claim. Not enforced on verification.
    pub token_expiry: i64,
}

/// Password hashing settings
#[derive(serde::Deserialize, Clone)]
pub struct CredentialSettings {
    pub bcrypt_cost: u32,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Load settings from `configuration.*`, then `APP_*` environment variables,
/// then `JWT_SECRET`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 3000)?
        .set_default("jwt.secret", "")?
        .set_default("jwt.token_expiry", 15000)?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
        .build()?;
    settings.try_deserialize::<Settings>()
}
