pub mod env {
    pub const CONFIG_FILE_ENV_VAR: &str = "WARDEN_CONFIG";
    pub const ENV_PREFIX: &str = "WARDEN";
    pub const ENV_SEPARATOR: &str = "__";
}

pub const DEFAULT_CONFIG_FILE: &str = "warden.json";
pub const DEFAULT_TOKEN_HEADER: &str = "authorization";
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 60 * 60 * 24;

pub mod prod {
    use std::time::Duration;

    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
    pub const BACKEND_TIMEOUT: Duration = Duration::from_secs(10);
}

pub mod test {
    use std::time::Duration;

    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub const BACKEND_TIMEOUT: Duration = Duration::from_millis(200);
}
