use std::env;
use std::str::FromStr;

use crate::shared::geo::GeoPoint;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub issues: IssueConfig,
    pub landing: LandingConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Which issue store backs the API
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Postgres(DatabaseConfig),
    /// In-process reference store, nothing survives a restart
    Memory,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// How `POST /api/issues` treats a body without coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingLocationPolicy {
    /// Each absent coordinate becomes 0, placing the issue at the origin
    #[default]
    Origin,
    /// Store the issue without a location
    Null,
    /// Refuse the issue with a validation error
    Reject,
}

impl FromStr for MissingLocationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "origin" => Ok(Self::Origin),
            "null" | "none" => Ok(Self::Null),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "MISSING_LOCATION_POLICY must be one of origin, null, reject (got '{}')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssueConfig {
    pub default_radius_km: f64,
    pub missing_location: MissingLocationPolicy,
    pub seed_sample_data: bool,
}

impl Default for IssueConfig {
    fn default() -> Self {
        Self {
            default_radius_km: IssueConfig::DEFAULT_RADIUS_KM,
            missing_location: MissingLocationPolicy::default(),
            seed_sample_data: true,
        }
    }
}

/// Landing page settings
#[derive(Debug, Clone)]
pub struct LandingConfig {
    pub template_dir: String,
    pub static_dir: String,
    pub map_center: GeoPoint,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            store: StoreConfig::from_env()?,
            issues: IssueConfig::from_env()?,
            landing: LandingConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, String> {
        let backend = env::var("ISSUE_STORE").unwrap_or_else(|_| "postgres".to_string());

        match backend.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres(DatabaseConfig::from_env()?)),
            "memory" | "reference" => Ok(Self::Memory),
            other => Err(format!(
                "ISSUE_STORE must be either postgres or memory (got '{}')",
                other
            )),
        }
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_or("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_or("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_or("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl IssueConfig {
    pub const DEFAULT_RADIUS_KM: f64 = 5.0;

    pub fn from_env() -> Result<Self, String> {
        let default_radius_km = parse_or("DEFAULT_RADIUS_KM", Self::DEFAULT_RADIUS_KM)?;
        if !default_radius_km.is_finite() || default_radius_km < 0.0 {
            return Err("DEFAULT_RADIUS_KM must be a non-negative number".to_string());
        }

        let missing_location = match env::var("MISSING_LOCATION_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => MissingLocationPolicy::default(),
        };

        let seed_sample_data = parse_or("SEED_SAMPLE_DATA", true)?;

        Ok(Self {
            default_radius_km,
            missing_location,
            seed_sample_data,
        })
    }
}

impl LandingConfig {
    const DEFAULT_MAP_LAT: f64 = 12.9716;
    const DEFAULT_MAP_LNG: f64 = 77.5946;

    pub fn from_env() -> Result<Self, String> {
        let template_dir = env::var("TEMPLATE_DIR").unwrap_or_else(|_| "templates".to_string());
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        let latitude = parse_or("MAP_DEFAULT_LAT", Self::DEFAULT_MAP_LAT)?;
        let longitude = parse_or("MAP_DEFAULT_LNG", Self::DEFAULT_MAP_LNG)?;

        Ok(Self {
            template_dir,
            static_dir,
            map_center: GeoPoint::new(longitude, latitude),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "CivicTrack API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Report and browse civic issues near a location".to_string());

        Ok(Self {
            title,
            version,
            description,
        })
    }
}

/// Read `key` from the environment, falling back to `default` when unset
fn parse_or<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid {}", key, std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}
