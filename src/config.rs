use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_days: i64,
    pub cookie_ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub base_url: String,
    pub sender: String,
    pub api_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub public_base_url: String,
    pub production: bool,
    pub reset_token_ttl_minutes: i64,
    pub jwt: JwtConfig,
    pub email: EmailConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "storefront".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "storefront-users".into()),
            ttl_days: std::env::var("JWT_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
            cookie_ttl_days: std::env::var("JWT_COOKIE_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
        };
        let email = EmailConfig {
            base_url: std::env::var("EMAIL_BASE_URL")
                .unwrap_or_else(|_| "https://api.postmarkapp.com".into()),
            sender: std::env::var("EMAIL_SENDER")
                .unwrap_or_else(|_| "no-reply@storefront.local".into()),
            api_token: std::env::var("EMAIL_API_TOKEN")?,
        };
        Ok(Self {
            database_url,
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".into()),
            production: std::env::var("APP_ENV")
                .map(|v| v == "production")
                .unwrap_or(false),
            reset_token_ttl_minutes: std::env::var("RESET_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(10),
            jwt,
            email,
        })
    }
}
