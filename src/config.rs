use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Reject owner-scoped listings that are not backed by a verified session.
    pub enforce_owner: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub enum StoreConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub jwt: Option<JwtConfig>,
    /// Empty means permissive CORS.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store = match std::env::var("PLANT_STORE").ok().as_deref() {
            Some("memory") => StoreConfig::Memory,
            _ => match std::env::var("DATABASE_URL") {
                Ok(database_url) => StoreConfig::Postgres {
                    database_url,
                    max_connections: std::env::var("DB_MAX_CONNECTIONS")
                        .ok()
                        .and_then(|v| v.parse::<u32>().ok())
                        .unwrap_or(10),
                },
                Err(_) => StoreConfig::Memory,
            },
        };

        let jwt = match std::env::var("JWT_SECRET") {
            Ok(secret) => Some(JwtConfig {
                secret,
                issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "plantcare".into()),
                audience: std::env::var("JWT_AUDIENCE")
                    .unwrap_or_else(|_| "plantcare-users".into()),
                enforce_owner: std::env::var("ENFORCE_OWNER")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(false),
            }),
            Err(_) => None,
        };

        let cors_origins = parse_origins(&std::env::var("CORS_ORIGINS").unwrap_or_default());

        Ok(Self {
            store,
            jwt,
            cors_origins,
        })
    }

    pub fn enforce_owner(&self) -> bool {
        self.jwt.as_ref().map(|j| j.enforce_owner).unwrap_or(false)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
