//! Processor keep/evict policy and where it is configured from.
//!
//! Before a capture session installs its pipeline, every processor that is
//! already configured is run past [`Settings::use_processor`]. The policy
//! works in one of two modes:
//!
//! - **keep**: only processors named in a keep list survive
//! - **evict**: every processor survives unless named in an evict list
//!
//! Each mode's names are split by where they came from, checked in this
//! order: per-test override, environment, config file, built-in defaults.
//! The first list that names a processor is reported as the reason for
//! the decision.
//!
//! # Configuration sources
//!
//! | setting | environment | `[package.metadata.logcap]` |
//! |---|---|---|
//! | keep list | `LOGCAP_KEEP` | `keep` |
//! | evict list | `LOGCAP_EVICT` | `evict` |
//! | no default lists | `LOGCAP_EXPLICIT` | `explicit` |
//! | settings report | `LOGCAP_REPORT` | `report` |
//! | report verbosity | `LOGCAP_VERBOSE` | |
//!
//! Supplying both a keep list and an evict list is a configuration error.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::Error;

/// Names of processors kept by default in keep mode.
///
/// These shape the event in ways that expected events are normally written
/// against, so dropping them would change what assertions see.
pub const DEFAULT_KEEP: &[&str] = &[
    "add_log_level",
    "PositionalArgumentsFormatter",
    "ExceptionRenderer",
    "dict_tracebacks",
    "merge_contextvars",
];

/// Names of processors evicted by default in evict mode.
///
/// These filter events before they can be captured, make them
/// non-deterministic, turn them into text, or hand them to another backend.
pub const DEFAULT_EVICT: &[&str] = &[
    "filter_by_level",
    "TimeStamper",
    "ConsoleRenderer",
    "JsonRenderer",
    "TracingForwarder",
];

const ENV_KEEP: &str = "LOGCAP_KEEP";
const ENV_EVICT: &str = "LOGCAP_EVICT";
const ENV_EXPLICIT: &str = "LOGCAP_EXPLICIT";
const ENV_REPORT: &str = "LOGCAP_REPORT";
const ENV_VERBOSE: &str = "LOGCAP_VERBOSE";

/// Which policy decides processor survival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Keep only the processors that are named
    Keep,
    /// Keep every processor except the ones that are named
    Evict,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Keep => write!(f, "keep"),
            Mode::Evict => write!(f, "evict"),
        }
    }
}

/// Where a processor name came from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    /// Named by the test itself when starting the session
    TestOverride,
    /// Named in an environment variable
    EnvVar,
    /// Named in the crate manifest
    ConfigFile,
    /// Built-in keep list
    DefaultKeepList,
    /// Built-in evict list
    DefaultEvictList,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::TestOverride => write!(f, "test-override"),
            Source::EnvVar => write!(f, "env-var"),
            Source::ConfigFile => write!(f, "config-file"),
            Source::DefaultKeepList => write!(f, "default-keep-list"),
            Source::DefaultEvictList => write!(f, "default-evict-list"),
        }
    }
}

/// When the settings report is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Always show it
    Always,
    /// Never show it
    Never,
    /// Show it when verbosity is above zero
    #[default]
    Auto,
}

impl ReportMode {
    /// Returns whether the report should be shown at `verbosity`.
    pub fn should_report(self, verbosity: u8) -> bool {
        match self {
            ReportMode::Always => true,
            ReportMode::Never => false,
            ReportMode::Auto => verbosity > 0,
        }
    }
}

impl FromStr for ReportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(ReportMode::Always),
            "never" => Ok(ReportMode::Never),
            "auto" => Ok(ReportMode::Auto),
            other => Err(format!(
                "unknown report mode '{other}', expected always, never or auto"
            )),
        }
    }
}

/// The decision for one processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the processor stays in the pipeline during capture
    pub keep: bool,
    /// The list that decided it, or `None` when no list names the processor
    pub reason: Option<Source>,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = if self.keep { "kept" } else { "evicted" };
        match self.reason {
            Some(reason) => write!(f, "{action} due to {reason}"),
            None => {
                let inverse = if self.keep { "evicted" } else { "kept" };
                write!(f, "{action} because no configuration {inverse} it")
            }
        }
    }
}

/// A named set of processor names from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    source: Source,
    names: BTreeSet<String>,
}

impl Partition {
    fn new(source: Source) -> Self {
        Self {
            source,
            names: BTreeSet::new(),
        }
    }

    fn with_defaults(source: Source, defaults: &[&str]) -> Self {
        Self {
            source,
            names: defaults.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Returns where these names came from.
    pub fn source(&self) -> Source {
        self.source
    }

    /// Returns the names, sorted.
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }
}

/// The keep/evict policy in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    mode: Mode,
    keep: Vec<Partition>,
    evict: Vec<Partition>,
    report: ReportMode,
    verbosity: u8,
}

impl Settings {
    /// Creates settings in keep mode with the built-in default lists.
    pub fn new() -> Self {
        Self {
            mode: Mode::Keep,
            keep: vec![
                Partition::new(Source::TestOverride),
                Partition::new(Source::EnvVar),
                Partition::new(Source::ConfigFile),
                Partition::with_defaults(Source::DefaultKeepList, DEFAULT_KEEP),
            ],
            evict: vec![
                Partition::new(Source::TestOverride),
                Partition::new(Source::EnvVar),
                Partition::new(Source::ConfigFile),
                Partition::with_defaults(Source::DefaultEvictList, DEFAULT_EVICT),
            ],
            report: ReportMode::Auto,
            verbosity: 0,
        }
    }

    /// Builds settings from user configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutuallyExclusive`] if both keep and evict names were
    /// supplied, from any combination of sources.
    pub fn from_options(options: &Options) -> Result<Self, Error> {
        let user_keep = !options.env_keep.is_empty() || !options.file_keep.is_empty();
        let user_evict = !options.env_evict.is_empty() || !options.file_evict.is_empty();
        if user_keep && user_evict {
            return Err(Error::MutuallyExclusive);
        }

        let mut settings = Settings::new();
        if options.explicit {
            settings.clear_defaults();
        }
        settings.extend(Mode::Keep, Source::EnvVar, &options.env_keep);
        settings.extend(Mode::Keep, Source::ConfigFile, &options.file_keep);
        settings.extend(Mode::Evict, Source::EnvVar, &options.env_evict);
        settings.extend(Mode::Evict, Source::ConfigFile, &options.file_evict);
        if user_evict {
            settings.mode = Mode::Evict;
        }
        settings.report = options.report;
        settings.verbosity = options.verbosity;
        Ok(settings)
    }

    /// Returns a copy with per-test names added for `mode`, switching to
    /// that mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutuallyExclusive`] if the other mode already has
    /// user-supplied names.
    pub fn with_override<I, S>(&self, mode: Mode, names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let other = match mode {
            Mode::Keep => Mode::Evict,
            Mode::Evict => Mode::Keep,
        };
        if self.has_user_names(other) {
            return Err(Error::MutuallyExclusive);
        }
        let mut settings = self.clone();
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        settings.extend(mode, Source::TestOverride, &names);
        settings.mode = mode;
        Ok(settings)
    }

    /// Decides whether the processor called `name` stays in the pipeline.
    ///
    /// # Examples
    ///
    /// ```
    /// use logcap::{Settings, Source};
    ///
    /// let settings = Settings::new();
    /// let verdict = settings.use_processor("add_log_level");
    /// assert!(verdict.keep);
    /// assert_eq!(verdict.reason, Some(Source::DefaultKeepList));
    ///
    /// assert!(!settings.use_processor("password_nerf").keep);
    /// ```
    pub fn use_processor(&self, name: &str) -> Verdict {
        let reason = self
            .partitions(self.mode)
            .iter()
            .find(|p| p.names.contains(name))
            .map(|p| p.source);
        match self.mode {
            Mode::Keep => Verdict {
                keep: reason.is_some(),
                reason,
            },
            Mode::Evict => Verdict {
                keep: reason.is_none(),
                reason,
            },
        }
    }

    /// Returns the active mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the partitions of `mode`, highest priority first.
    pub fn partitions(&self, mode: Mode) -> &[Partition] {
        match mode {
            Mode::Keep => &self.keep,
            Mode::Evict => &self.evict,
        }
    }

    /// Returns when the settings report is shown.
    pub fn report_mode(&self) -> ReportMode {
        self.report
    }

    /// Returns the report verbosity.
    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    /// Returns whether the settings report should be shown.
    pub fn should_report(&self) -> bool {
        self.report.should_report(self.verbosity)
    }

    /// Resets to the pristine defaults: keep mode, no user names, default
    /// lists restored.
    pub fn reset(&mut self) {
        *self = Settings::new();
    }

    fn clear_defaults(&mut self) {
        for partition in self.keep.iter_mut().chain(self.evict.iter_mut()) {
            if matches!(
                partition.source,
                Source::DefaultKeepList | Source::DefaultEvictList
            ) {
                partition.names.clear();
            }
        }
    }

    fn has_user_names(&self, mode: Mode) -> bool {
        self.partitions(mode).iter().any(|p| {
            !matches!(p.source, Source::DefaultKeepList | Source::DefaultEvictList)
                && !p.names.is_empty()
        })
    }

    fn extend(&mut self, mode: Mode, source: Source, names: &[String]) {
        let partitions = match mode {
            Mode::Keep => &mut self.keep,
            Mode::Evict => &mut self.evict,
        };
        if let Some(partition) = partitions.iter_mut().find(|p| p.source == source) {
            partition.names.extend(names.iter().cloned());
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// User configuration, as read from the environment and the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Keep names from `LOGCAP_KEEP`
    pub env_keep: Vec<String>,
    /// Evict names from `LOGCAP_EVICT`
    pub env_evict: Vec<String>,
    /// Keep names from the manifest
    pub file_keep: Vec<String>,
    /// Evict names from the manifest
    pub file_evict: Vec<String>,
    /// Clear the built-in default lists
    pub explicit: bool,
    /// When to show the settings report
    pub report: ReportMode,
    /// Report verbosity
    pub verbosity: u8,
}

impl Options {
    /// Loads options from `$CARGO_MANIFEST_DIR/Cargo.toml` (when present)
    /// and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the manifest cannot be read or parsed, or
    /// an environment variable holds an invalid value.
    pub fn load() -> Result<Self, Error> {
        let file = match std::env::var_os("CARGO_MANIFEST_DIR") {
            Some(dir) => FileConfig::read(&Path::new(&dir).join("Cargo.toml"))?,
            None => FileConfig::default(),
        };
        Options::merge(file, |var| std::env::var(var).ok())
    }

    /// Reads options from the environment only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid values.
    pub fn from_env() -> Result<Self, Error> {
        Options::from_env_with(|var| std::env::var(var).ok())
    }

    /// Reads options through a variable lookup function.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid values.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        Options::merge(FileConfig::default(), lookup)
    }

    /// Reads options from the `[package.metadata.logcap]` table of a Cargo
    /// manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the manifest is not valid TOML or the
    /// table has the wrong shape. `origin` names the manifest in the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use logcap::{Options, ReportMode};
    ///
    /// let manifest = r#"
    ///     [package]
    ///     name = "app"
    ///
    ///     [package.metadata.logcap]
    ///     evict = ["JsonRenderer", "password_nerf"]
    ///     report = "always"
    /// "#;
    /// let options = Options::from_manifest_str(manifest, "Cargo.toml").unwrap();
    /// assert_eq!(options.file_evict, vec!["JsonRenderer", "password_nerf"]);
    /// assert_eq!(options.report, ReportMode::Always);
    /// ```
    pub fn from_manifest_str(manifest: &str, origin: &str) -> Result<Self, Error> {
        let file = FileConfig::parse(manifest, origin)?;
        Options::merge(file, |_| None)
    }

    fn merge<F>(file: FileConfig, lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_report = match lookup(ENV_REPORT) {
            Some(value) => Some(
                value
                    .parse::<ReportMode>()
                    .map_err(|e| Error::config_env(ENV_REPORT, e))?,
            ),
            None => None,
        };
        let verbosity = match lookup(ENV_VERBOSE) {
            Some(value) => value
                .trim()
                .parse::<u8>()
                .map_err(|e| Error::config_env(ENV_VERBOSE, e))?,
            None => 0,
        };
        let env_explicit = match lookup(ENV_EXPLICIT) {
            Some(value) => parse_flag(&value).ok_or_else(|| {
                Error::config_env(ENV_EXPLICIT, format!("'{value}' is not a boolean"))
            })?,
            None => false,
        };

        Ok(Options {
            env_keep: lookup(ENV_KEEP).map(|v| split_names(&v)).unwrap_or_default(),
            env_evict: lookup(ENV_EVICT).map(|v| split_names(&v)).unwrap_or_default(),
            file_keep: file.keep.map(NameList::into_names).unwrap_or_default(),
            file_evict: file.evict.map(NameList::into_names).unwrap_or_default(),
            explicit: env_explicit || file.explicit.unwrap_or(false),
            report: env_report.or(file.report).unwrap_or_default(),
            verbosity,
        })
    }
}

fn split_names(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// A name list given either as one whitespace-separated string or as an
/// array of names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NameList {
    One(String),
    Many(Vec<String>),
}

impl NameList {
    fn into_names(self) -> Vec<String> {
        match self {
            NameList::One(s) => split_names(&s),
            NameList::Many(names) => names,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    keep: Option<NameList>,
    evict: Option<NameList>,
    explicit: Option<bool>,
    report: Option<ReportMode>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    package: Option<ManifestPackage>,
}

#[derive(Debug, Deserialize)]
struct ManifestPackage {
    metadata: Option<ManifestMetadata>,
}

#[derive(Debug, Deserialize)]
struct ManifestMetadata {
    logcap: Option<FileConfig>,
}

impl FileConfig {
    fn read(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| Error::config_file(path, e))?;
        FileConfig::parse(&text, &path.display().to_string())
    }

    fn parse(text: &str, origin: &str) -> Result<Self, Error> {
        let manifest: Manifest = toml::from_str(text).map_err(|e| Error::Config {
            origin: origin.to_string(),
            message: e.message().to_string(),
        })?;
        Ok(manifest
            .package
            .and_then(|p| p.metadata)
            .and_then(|m| m.logcap)
            .unwrap_or_default())
    }
}

static GLOBAL: OnceLock<Result<Settings, Error>> = OnceLock::new();

impl Settings {
    /// Returns the process-wide settings, loading them on first use.
    ///
    /// # Errors
    ///
    /// Returns the configuration error from the first load attempt; the
    /// result is cached, so a broken configuration fails every session the
    /// same way.
    pub fn global() -> Result<&'static Settings, Error> {
        GLOBAL
            .get_or_init(|| {
                let loaded =
                    Options::load().and_then(|options| Settings::from_options(&options));
                match &loaded {
                    Ok(settings) => {
                        tracing::debug!(mode = %settings.mode(), "loaded logcap settings")
                    }
                    Err(err) => tracing::debug!(error = %err, "invalid logcap settings"),
                }
                loaded
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_keep_mode() {
        let settings = Settings::new();
        assert_eq!(settings.mode(), Mode::Keep);
        for name in DEFAULT_KEEP {
            let verdict = settings.use_processor(name);
            assert!(verdict.keep);
            assert_eq!(verdict.reason, Some(Source::DefaultKeepList));
        }
        let verdict = settings.use_processor("TimeStamper");
        assert_eq!(verdict, Verdict { keep: false, reason: None });
    }

    #[test]
    fn evict_mode_keeps_unnamed() {
        let options = Options {
            file_evict: names(&["password_nerf"]),
            ..Options::default()
        };
        let settings = Settings::from_options(&options).unwrap();
        assert_eq!(settings.mode(), Mode::Evict);

        let verdict = settings.use_processor("password_nerf");
        assert_eq!(verdict, Verdict { keep: false, reason: Some(Source::ConfigFile) });

        let verdict = settings.use_processor("JsonRenderer");
        assert_eq!(verdict, Verdict { keep: false, reason: Some(Source::DefaultEvictList) });

        let verdict = settings.use_processor("add_logger_name");
        assert_eq!(verdict, Verdict { keep: true, reason: None });
    }

    #[test]
    fn first_matching_partition_is_reported() {
        let options = Options {
            env_keep: names(&["add_log_level"]),
            file_keep: names(&["add_log_level", "password_nerf"]),
            ..Options::default()
        };
        let settings = Settings::from_options(&options).unwrap();
        assert_eq!(settings.use_processor("add_log_level").reason, Some(Source::EnvVar));
        assert_eq!(settings.use_processor("password_nerf").reason, Some(Source::ConfigFile));
    }

    #[test]
    fn keep_and_evict_are_mutually_exclusive() {
        let options = Options {
            file_keep: names(&["foo"]),
            env_evict: names(&["bar"]),
            ..Options::default()
        };
        assert_eq!(Settings::from_options(&options), Err(Error::MutuallyExclusive));
    }

    #[test]
    fn explicit_clears_defaults() {
        let options = Options {
            explicit: true,
            ..Options::default()
        };
        let settings = Settings::from_options(&options).unwrap();
        assert!(!settings.use_processor("add_log_level").keep);

        let options = Options {
            explicit: true,
            env_evict: names(&["x"]),
            ..Options::default()
        };
        let settings = Settings::from_options(&options).unwrap();
        assert!(settings.use_processor("TimeStamper").keep);
        assert!(!settings.use_processor("x").keep);
    }

    #[test]
    fn overrides_take_priority_and_switch_mode() {
        let settings = Settings::new()
            .with_override(Mode::Evict, ["add_log_level"])
            .unwrap();
        assert_eq!(settings.mode(), Mode::Evict);
        assert_eq!(
            settings.use_processor("add_log_level"),
            Verdict { keep: false, reason: Some(Source::TestOverride) }
        );

        let settings = Settings::new().with_override(Mode::Keep, ["custom"]).unwrap();
        assert_eq!(settings.use_processor("custom").reason, Some(Source::TestOverride));
        assert!(settings.use_processor("add_log_level").keep);
    }

    #[test]
    fn override_conflicting_with_user_config_fails() {
        let options = Options {
            env_keep: names(&["foo"]),
            ..Options::default()
        };
        let settings = Settings::from_options(&options).unwrap();
        assert_eq!(
            settings.with_override(Mode::Evict, ["bar"]),
            Err(Error::MutuallyExclusive)
        );
        assert!(settings.with_override(Mode::Keep, ["bar"]).is_ok());
    }

    #[test]
    fn reset_restores_defaults() {
        let options = Options {
            explicit: true,
            env_evict: names(&["x"]),
            ..Options::default()
        };
        let mut settings = Settings::from_options(&options).unwrap();
        settings.reset();
        assert_eq!(settings, Settings::new());
    }

    #[test]
    fn env_options_are_parsed() {
        let options = Options::from_env_with(env(&[
            ("LOGCAP_KEEP", "password_nerf, add_logger_name  custom"),
            ("LOGCAP_EXPLICIT", "yes"),
            ("LOGCAP_REPORT", "Always"),
            ("LOGCAP_VERBOSE", "2"),
        ]))
        .unwrap();
        assert_eq!(options.env_keep, names(&["password_nerf", "add_logger_name", "custom"]));
        assert!(options.explicit);
        assert_eq!(options.report, ReportMode::Always);
        assert_eq!(options.verbosity, 2);
    }

    #[test]
    fn bad_env_values_are_config_errors() {
        let err = Options::from_env_with(env(&[("LOGCAP_REPORT", "loud")])).unwrap_err();
        assert!(matches!(err, Error::Config { ref origin, .. } if origin == "$LOGCAP_REPORT"));

        let err = Options::from_env_with(env(&[("LOGCAP_EXPLICIT", "maybe")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = Options::from_env_with(env(&[("LOGCAP_VERBOSE", "lots")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn manifest_options_are_parsed() {
        let options = Options::from_manifest_str(
            r#"
            [package]
            name = "app"

            [package.metadata.logcap]
            keep = "foo bar"
            explicit = true
            "#,
            "Cargo.toml",
        )
        .unwrap();
        assert_eq!(options.file_keep, names(&["foo", "bar"]));
        assert!(options.explicit);
        assert_eq!(options.report, ReportMode::Auto);
    }

    #[test]
    fn manifest_without_table_is_empty() {
        let options = Options::from_manifest_str("[package]\nname = \"app\"\n", "Cargo.toml").unwrap();
        assert_eq!(options, Options::default());
    }

    #[test]
    fn invalid_manifest_is_config_error() {
        let err = Options::from_manifest_str("[package.metadata.logcap]\nkeep = 3\n", "Cargo.toml")
            .unwrap_err();
        assert!(matches!(err, Error::Config { ref origin, .. } if origin == "Cargo.toml"));
    }

    #[test]
    fn report_mode_decides_by_verbosity() {
        assert!(ReportMode::Always.should_report(0));
        assert!(!ReportMode::Never.should_report(3));
        assert!(!ReportMode::Auto.should_report(0));
        assert!(ReportMode::Auto.should_report(1));
    }

    #[test]
    fn verdict_display() {
        let kept = Verdict { keep: true, reason: Some(Source::ConfigFile) };
        assert_eq!(kept.to_string(), "kept due to config-file");
        let evicted = Verdict { keep: false, reason: None };
        assert_eq!(evicted.to_string(), "evicted because no configuration kept it");
    }
}
