// --- File: crates/bookline_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g., DATABASE_URL loaded via BOOKLINE__DATABASE__URL or DATABASE_URL
}

// --- Mailer Config ---
// Holds non-secret mailer config. The API token is loaded via env override
// (BOOKLINE__MAILER__API_KEY) so it never lives in a config file.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MailerConfig {
    /// Message endpoint of the transactional mail provider.
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    /// Address the notification is sent from.
    pub from_address: String,
    /// Operator inbox that receives new-booking notifications.
    pub notify_address: String,
}

// --- Booking Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BookingConfig {
    /// IANA timezone the submitted wall-clock times are interpreted in,
    /// or "naive" to skip timezone conversion entirely.
    pub time_zone: Option<String>,
    /// Width of one bookable slot, in minutes.
    pub slot_width_minutes: Option<i64>,
    /// How many consecutive slots a single booking blocks (the booked slot
    /// included).
    pub slots_per_booking: Option<u32>,
}

// --- CORS Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CorsConfig {
    /// Browser origins allowed to call the API.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_mailer: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub mailer: Option<MailerConfig>,
    #[serde(default)]
    pub booking: Option<BookingConfig>,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
}
