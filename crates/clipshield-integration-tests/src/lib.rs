//! Cross-crate test support for ClipShield
//!
//! The tests under `tests/` drive the detector and redactor the way the CLI
//! does, with configuration loaded from real files.

use clipshield_pii::{
    DetectionResult, PIIDetector, PIIRedactor, RedactionMode, RegexPIIDetector, ShieldConfig,
    StandardRedactor,
};
use std::path::PathBuf;
use tempfile::TempDir;

/// Detector, redactor and configuration wired together
pub struct Pipeline {
    detector: RegexPIIDetector,
    redactor: StandardRedactor,
    pub config: ShieldConfig,
}

impl Pipeline {
    pub fn new(config: ShieldConfig) -> clipshield_pii::Result<Self> {
        Ok(Self {
            detector: RegexPIIDetector::new()?,
            redactor: StandardRedactor::new(),
            config,
        })
    }

    pub fn scan(&self, text: &str) -> DetectionResult {
        self.detector.detect(text, &self.config)
    }

    pub fn redact(&self, text: &str, mode: RedactionMode) -> String {
        let result = self.scan(text);
        self.redactor.redact(text, &result.matches, mode, &self.config)
    }
}

/// Install a test-friendly subscriber; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Write `contents` to `name` inside `dir`
pub fn write_config(dir: &TempDir, name: &str, contents: &str) -> std::io::Result<PathBuf> {
    let path = dir.path().join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
}
