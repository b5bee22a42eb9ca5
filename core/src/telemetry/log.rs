use log::{debug, info, warn};

/// Thin wrapper so every stage logs under the same target.
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn for_stage(target: &'static str) -> Self {
        Self { target }
    }

    pub fn record(&self, message: &str) {
        info!(target: self.target, "{}", message);
    }

    pub fn detail(&self, message: &str) {
        debug!(target: self.target, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!(target: self.target, "{}", message);
    }
}
