pub const ENV_BOARD_URL: &str = "TAGBOARD_URL";
pub const ENV_PAGE_SIZE: &str = "TAGBOARD_PAGE_SIZE";
pub const ENV_CHUNK_WIDTH: &str = "TAGBOARD_CHUNK_WIDTH";
pub const ENV_TIMEOUT_MS: &str = "TAGBOARD_TIMEOUT_MS";

pub const DEFAULT_PAGE_SIZE: i32 = 28;
pub const DEFAULT_CHUNK_WIDTH: i32 = 13;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub base_url: String,
    pub page_size: i32,
    pub chunk_width: i32,
    pub timeout_ms: u64,
}

impl BoardConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            page_size: DEFAULT_PAGE_SIZE,
            chunk_width: DEFAULT_CHUNK_WIDTH,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var(ENV_BOARD_URL).ok().filter(|s| !s.trim().is_empty())?;

        let page_size = parse_positive_i32(
            std::env::var(ENV_PAGE_SIZE).ok().as_deref(),
            DEFAULT_PAGE_SIZE,
        );
        let chunk_width = parse_positive_i32(
            std::env::var(ENV_CHUNK_WIDTH).ok().as_deref(),
            DEFAULT_CHUNK_WIDTH,
        );
        let timeout_ms = parse_positive_u64(
            std::env::var(ENV_TIMEOUT_MS).ok().as_deref(),
            DEFAULT_TIMEOUT_MS,
        );

        Some(Self {
            base_url: normalize_base_url(&base_url),
            page_size,
            chunk_width,
            timeout_ms,
        })
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

pub(crate) fn parse_positive_i32(raw: Option<&str>, default: i32) -> i32 {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

pub(crate) fn parse_positive_u64(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}
