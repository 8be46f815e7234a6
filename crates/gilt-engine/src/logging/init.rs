use log::LevelFilter;

/// Modules that are too chatty at info level; they stay at warn unless a
/// filter says otherwise.
const NOISY_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level used when neither `filter` nor `RUST_LOG` is set.
    pub level: LevelFilter,
    /// An `env_logger` filter string such as `"gilt_engine=debug,wgpu=warn"`.
    /// Takes priority over `RUST_LOG`.
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: LevelFilter::Info, filter: None, write_style: env_logger::WriteStyle::Auto }
    }
}

impl LoggingConfig {
    /// Resolves the filter string, with `env` standing in for `RUST_LOG`.
    fn filter_spec(&self, env: Option<&str>) -> String {
        if let Some(filter) = self.filter.as_deref().or(env).filter(|f| !f.trim().is_empty()) {
            return filter.to_owned();
        }
        let level = self.level.to_string().to_lowercase();
        let quiet = LevelFilter::Warn.min(self.level).to_string().to_lowercase();
        std::iter::once(level)
            .chain(NOISY_MODULES.iter().map(|m| format!("{m}={quiet}")))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Installs the global logger.
///
/// Returns `false` if a logger was already installed, in which case `config`
/// is ignored.
pub fn init_logging(config: LoggingConfig) -> bool {
    let env = std::env::var("RUST_LOG").ok();
    let spec = config.filter_spec(env.as_deref());

    let installed = env_logger::Builder::new()
        .parse_filters(&spec)
        .write_style(config.write_style)
        .try_init()
        .is_ok();
    if installed {
        log::debug!("logging initialized with filter {spec:?}");
    }
    installed
}
