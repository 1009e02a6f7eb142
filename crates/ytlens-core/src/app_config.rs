/// Credentials for the optional Airtable export.
///
/// Only built when all three values are present; a partially configured
/// environment leaves [`AppConfig::airtable`] as `None`.
#[derive(Clone)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
    pub api_base_url: String,
}

impl std::fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("api_key", &"[redacted]")
            .field("base_id", &self.base_id)
            .field("table_name", &self.table_name)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub youtube_api_key: String,
    pub youtube_api_base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub comment_page_size: u32,
    pub inter_page_delay_ms: u64,
    pub airtable: Option<AirtableConfig>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("youtube_api_key", &"[redacted]")
            .field("youtube_api_base_url", &self.youtube_api_base_url)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("comment_page_size", &self.comment_page_size)
            .field("inter_page_delay_ms", &self.inter_page_delay_ms)
            .field("airtable", &self.airtable)
            .finish()
    }
}
