/// Configurations for the Ferrule toolkit
#[derive(Debug, Clone)]
pub struct Config {
    pub profiling: ProfilingMode,
    /// Filter directive for the log subscriber, e.g. `"debug,ferrule_widgets=trace"`.
    pub log_filter: Option<String>,
    /// Address the puffin server binds to in [`ProfilingMode::WithWebServer`].
    pub profiling_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            profiling: ProfilingMode::Off,
            log_filter: None,
            profiling_address: String::from("0.0.0.0:8585"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingMode {
    /// Profiling is disabled
    Off,
    /// Profiling scopes are recorded in-process
    On,
    /// Profiling scopes are recorded and served to external tools such as
    /// 'puffin_viewer'
    WithWebServer,
}
