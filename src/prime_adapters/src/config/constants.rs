pub mod env {
    pub const JWT_SECRET_ENV_VAR: &str = "JWT_SECRET";
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const ENV_PREFIX: &str = "PRIME";
    pub const ENV_SEPARATOR: &str = "__";
}

pub const DEFAULT_CONFIG_FILE: &str = "config/default";
pub const LOCAL_CONFIG_FILE: &str = "config/local";

pub const MIN_JWT_SECRET_BYTES: usize = 32;
/// Ten years; keeps `exp` arithmetic far from overflow.
pub const MAX_TOKEN_TTL_SECONDS: i64 = 315_360_000;

pub mod google {
    pub const JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
    pub const ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];
    pub const ALGORITHM: &str = "RS256";
    pub const JWKS_MIN_REFRESH_SECONDS: u64 = 60;
}

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
    pub const TOKEN_TTL_SECONDS: i64 = 86_400;

    pub mod password {
        pub const MEMORY_KIB: u32 = 15_000;
        pub const ITERATIONS: u32 = 2;
        pub const PARALLELISM: u32 = 1;
    }
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
}
