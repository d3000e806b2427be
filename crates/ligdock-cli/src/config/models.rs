use ligdock::engine::config::BatchConfig;

pub struct AppConfig {
    pub batch: BatchConfig,
    pub dry_run: bool,
}
