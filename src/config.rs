use std::fmt::Display;

/// The operation each stress worker performs before reading the proxy back.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum StressMode {
    /// Replace the value with a fresh one.
    #[default]
    Replace,
    /// Replace the value with a fresh factory.
    Resolve,
    /// Reset a factory-backed proxy.
    Reset,
}

impl Display for StressMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Replace => "replace",
            Self::Resolve => "resolve",
            Self::Reset => "reset",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StressConfig {
    pub threads: usize,
    pub iterations: usize,
    pub mode: StressMode,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: 10,
            iterations: 100,
            mode: StressMode::default(),
        }
    }
}

impl StressConfig {
    pub fn set_threads(mut self, value: usize) -> Self {
        self.threads = value;
        self
    }

    pub fn set_iterations(mut self, value: usize) -> Self {
        self.iterations = value;
        self
    }

    pub fn set_mode(mut self, value: StressMode) -> Self {
        self.mode = value;
        self
    }

    pub fn total_calls(&self) -> usize {
        self.threads * self.iterations
    }
}
