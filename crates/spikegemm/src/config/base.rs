use alloc::sync::Arc;

use super::logger::{LogLevel, LoggerConfig};

/// Static mutex holding the global configuration, initialized as `None`.
static SPIKEGEMM_GLOBAL_CONFIG: spin::Mutex<Option<Arc<GlobalConfig>>> = spin::Mutex::new(None);

/// Global configuration of the crate.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GlobalConfig {
    /// Configuration for kernel setup.
    #[serde(default)]
    pub setup: SetupConfig,
}

/// Configuration of the descriptor setup path.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SetupConfig {
    #[serde(default)]
    pub logger: LoggerConfig<SetupLogLevel>,
}

/// Verbosity of the setup logger.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SetupLogLevel {
    /// Nothing is logged.
    #[default]
    #[serde(rename = "disabled")]
    Disabled,

    /// The selected kernel path is logged.
    #[serde(rename = "basic")]
    Basic,

    /// The selected kernel path is logged along with the resolved descriptor.
    #[serde(rename = "full")]
    Full,
}

impl LogLevel for SetupLogLevel {}

impl GlobalConfig {
    /// Retrieves the current global configuration, loading it from the current directory if not set.
    ///
    /// If no configuration is set, it attempts to load one from `spikegemm.toml` or
    /// `SpikeGemm.toml` in the current directory or its parents. If no file is found, a default
    /// configuration is used.
    ///
    /// The kernels never call this: only the setup path reads the configuration.
    pub fn get() -> Arc<Self> {
        let mut state = SPIKEGEMM_GLOBAL_CONFIG.lock();

        match state.as_ref() {
            Some(config) => config.clone(),
            None => {
                cfg_if::cfg_if! {
                    if #[cfg(std_io)] {
                        let config = Self::from_current_dir();
                        let config = config.override_from_env();
                    } else {
                        let config = Self::default();
                    }
                }

                let config = Arc::new(config);
                *state = Some(config.clone());
                config
            }
        }
    }

    #[cfg(std_io)]
    /// Save the current configuration to the provided file path.
    pub fn save_default<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<()> {
        use std::io::Write;

        let config = Self::get();
        let content = toml::to_string_pretty(config.as_ref()).map_err(std::io::Error::other)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(content.as_bytes())?;

        Ok(())
    }

    /// Sets the global configuration to the provided value.
    ///
    /// # Panics
    /// Panics if the configuration has already been set or read, as it cannot be overridden.
    pub fn set(config: Self) {
        let mut state = SPIKEGEMM_GLOBAL_CONFIG.lock();
        if state.is_some() {
            panic!("Cannot set the global configuration multiple times.");
        }
        *state = Some(Arc::new(config));
    }

    #[cfg(std_io)]
    /// Overrides configuration fields based on the `SPIKEGEMM_DEBUG_LOG` environment variable.
    pub fn override_from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("SPIKEGEMM_DEBUG_LOG") {
            let logger = &mut self.setup.logger;
            logger.level = SetupLogLevel::Full;

            match val.as_str() {
                "stdout" => logger.stdout = true,
                "stderr" => logger.stderr = true,
                "1" | "true" => logger.file = Some("/tmp/spikegemm.log".into()),
                "0" | "false" => logger.level = SetupLogLevel::Disabled,
                file_path => logger.file = Some(file_path.into()),
            }
        }

        self
    }

    // Traverses up the directory tree until a configuration file is found or the root is reached.
    #[cfg(std_io)]
    fn from_current_dir() -> Self {
        let Ok(mut dir) = std::env::current_dir() else {
            return Self::default();
        };

        loop {
            if let Ok(content) = Self::from_file_path(dir.join("spikegemm.toml")) {
                return content;
            }

            if let Ok(content) = Self::from_file_path(dir.join("SpikeGemm.toml")) {
                return content;
            }

            if !dir.pop() {
                break;
            }
        }

        Self::default()
    }

    #[cfg(std_io)]
    fn from_file_path<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = match toml::from_str(&content) {
            Ok(val) => val,
            Err(err) => panic!("The file provided doesn't have the right format => {err:?}"),
        };

        Ok(config)
    }
}
