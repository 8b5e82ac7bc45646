//! Post-load checks that produce warnings rather than errors.
use std::collections::HashMap;
use std::path::Path;

use super::manifest::TrackedEntry;

/// A validation warning detected after loading the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Name of the validator that raised it (e.g. "nesting").
    pub source: String,
    /// The entry that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Build a warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for configuration validators.
pub trait ConfigValidator {
    /// Validate the entries and return any warnings found.
    fn validate(&self, files_dir: &Path) -> Vec<ValidationWarning>;

    /// Short name of this validator.
    fn name(&self) -> &'static str;
}

/// Flags sources that live inside another tracked source, which would be
/// copied twice.
#[derive(Debug)]
pub struct NestingValidator<'a> {
    entries: &'a [TrackedEntry],
}

impl<'a> NestingValidator<'a> {
    /// Validator over `entries`.
    #[must_use]
    pub const fn new(entries: &'a [TrackedEntry]) -> Self {
        Self { entries }
    }
}

impl ConfigValidator for NestingValidator<'_> {
    fn validate(&self, _files_dir: &Path) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        for inner in self.entries {
            for outer in self.entries {
                if inner.source != outer.source && inner.source.starts_with(&outer.source) {
                    warnings.push(ValidationWarning::new(
                        self.name(),
                        inner.source.display().to_string(),
                        format!("nested inside tracked {}", outer.source.display()),
                    ));
                }
            }
        }
        warnings
    }

    fn name(&self) -> &'static str {
        "nesting"
    }
}

/// Flags two sources sharing one repository path.
#[derive(Debug)]
pub struct RepoPathValidator<'a> {
    entries: &'a [TrackedEntry],
}

impl<'a> RepoPathValidator<'a> {
    /// Validator over `entries`.
    #[must_use]
    pub const fn new(entries: &'a [TrackedEntry]) -> Self {
        Self { entries }
    }
}

impl ConfigValidator for RepoPathValidator<'_> {
    fn validate(&self, _files_dir: &Path) -> Vec<ValidationWarning> {
        let mut first_owner: HashMap<&Path, &Path> = HashMap::new();
        let mut warnings = Vec::new();
        for entry in self.entries {
            if let Some(owner) = first_owner.get(entry.repo_path.as_path()) {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    entry.source.display().to_string(),
                    format!(
                        "repository path {} is also used by {}",
                        entry.repo_path.display(),
                        owner.display()
                    ),
                ));
            } else {
                first_owner.insert(&entry.repo_path, &entry.source);
            }
        }
        warnings
    }

    fn name(&self) -> &'static str {
        "repo-paths"
    }
}

/// Flags entries that exist neither on the system nor in the repository.
#[derive(Debug)]
pub struct PresenceValidator<'a> {
    entries: &'a [TrackedEntry],
}

impl<'a> PresenceValidator<'a> {
    /// Validator over `entries`.
    #[must_use]
    pub const fn new(entries: &'a [TrackedEntry]) -> Self {
        Self { entries }
    }
}

impl ConfigValidator for PresenceValidator<'_> {
    fn validate(&self, files_dir: &Path) -> Vec<ValidationWarning> {
        self.entries
            .iter()
            .filter(|e| !e.source.exists() && !e.repo_location(files_dir).exists())
            .map(|e| {
                ValidationWarning::new(
                    self.name(),
                    e.source.display().to_string(),
                    "missing from both the system and the repository",
                )
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "presence"
    }
}

/// Validate all configuration and return collected warnings.
#[must_use]
pub fn validate_all(config: &super::Config) -> Vec<ValidationWarning> {
    let validators: Vec<Box<dyn ConfigValidator>> = vec![
        Box::new(NestingValidator::new(&config.entries)),
        Box::new(RepoPathValidator::new(&config.entries)),
        Box::new(PresenceValidator::new(&config.entries)),
    ];

    let files_dir = config.settings.files_dir();
    validators
        .iter()
        .flat_map(|v| v.validate(&files_dir))
        .collect()
}
