use tracing::info;

/// Suppresses side effects when enabled, logging what would have run.
#[derive(Debug, Default)]
pub struct DryRun {
    enabled: bool,
    skipped: u64,
    last_action: Option<String>,
}

impl DryRun {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    /// Returns `true` when the action must be skipped.
    pub fn intercept(&mut self, description: impl Into<String>) -> bool {
        if !self.enabled {
            return false;
        }
        let description = description.into();
        info!(target: "dry_run", action = %description, "would execute");
        self.skipped += 1;
        self.last_action = Some(description);
        true
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }
}
