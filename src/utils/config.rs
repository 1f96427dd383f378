/// Runner configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint probed before the step sequence; any response means reachable
    pub probe_url: String,

    /// Timeout for the connectivity probe (ms)
    pub probe_timeout_ms: u64,

    /// Timeout applied to each step request (ms)
    pub request_timeout_ms: u64,

    /// Stop before the first step when the probe fails
    pub halt_on_abort: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_url: "https://www.gstatic.com/generate_204".to_string(),
            probe_timeout_ms: 5000,
            request_timeout_ms: 10000,
            halt_on_abort: true,
        }
    }
}
