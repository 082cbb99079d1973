//! Settings for the publication core
//!
//! The upload directory root and the default validity window are an
//! explicit value constructed once and injected into the services that
//! need them, never process-wide mutable state.

use std::path::PathBuf;

use serde::Deserialize;

/// Runtime settings for the publication and deletion services.
#[derive(Clone, Debug, Deserialize)]
pub struct PublicationSettings {
    /// Root directory under which uploaded image groups are stored.
    pub upload_root: PathBuf,
    /// Validity window applied to a post when the submission supplies none.
    pub default_validity_days: i64,
    /// Per-submission deadline covering resolve, guard, staging, and the
    /// transactional write loop.
    pub request_deadline_secs: u64,
}

impl Default for PublicationSettings {
    fn default() -> Self {
        Self {
            upload_root: PathBuf::from("uploads"),
            default_validity_days: 30,
            request_deadline_secs: 30,
        }
    }
}

impl PublicationSettings {
    /// Load settings from `conf/bacheca.yml` (if present) overlaid with
    /// `BACHECA_*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .set_default("upload_root", "uploads")?
            .set_default("default_validity_days", 30_i64)?
            .set_default("request_deadline_secs", 30_i64)?
            .add_source(config::File::with_name("conf/bacheca").required(false))
            .add_source(config::Environment::with_prefix("BACHECA"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PublicationSettings::default();
        assert_eq!(settings.upload_root, PathBuf::from("uploads"));
        assert_eq!(settings.default_validity_days, 30);
        assert_eq!(settings.request_deadline_secs, 30);
    }
}
