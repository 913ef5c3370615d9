//! Scanning Plugin - alert on added lines matching regex rules
//!
//! For every patch whose filename passes the plugin's [`FilenamePattern`], the added
//! lines are run through the rule engine. Each match becomes an alert unless the
//! deduplicator has just seen the same one.

use crate::alerts::api::{
    shared_last_alert, Alert, AlertDeduplicator, AlertDispatcher, AlertIdentity, LogDispatcher,
    Severity,
};
use crate::core::html::escape_html;
use crate::core::version::get_api_version;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::patterns::{FilenamePattern, FilenamePreset};
use crate::plugin::settings::PluginSettings;
use crate::plugin::traits::CommitPlugin;
use crate::plugin::types::PluginInfo;
use crate::rules::api::{
    ReloadPolicy, RuleAction, RuleEngine, RuleEngineLoader, RuleSetLoader, SelfTestReport,
};
use crate::watcher::types::{CommitEvent, CommitRef, PatchEvent, RepoConfig, RepoWatcher, WatcherKind};
use log::{debug, error, trace};
use std::path::PathBuf;
use std::sync::Arc;

/// Filename used in alerts raised without a patch
pub const NO_FILE: &str = "NOFILE";

/// A match waiting for dispatch
struct PendingAlert {
    subject: String,
    offending_line: String,
    severity: Severity,
}

pub struct ScanningPlugin {
    name: String,
    filename_pattern: FilenamePattern,
    rules: Option<Arc<dyn RuleEngineLoader>>,
    dispatcher: Arc<dyn AlertDispatcher>,
    dedup: Arc<dyn AlertDeduplicator>,
    recipients: Vec<String>,
    product: String,
}

impl ScanningPlugin {
    /// Plugin bound to one filename regex, an optional rule file and the alert
    /// recipients
    ///
    /// The rule file is not read here; it is loaded on first use. A rule file
    /// without recipients is a configuration error.
    pub fn new(
        name: &str,
        filename_pattern: &str,
        rule_file: Option<PathBuf>,
        recipients: Vec<String>,
    ) -> PluginResult<Self> {
        let pattern = FilenamePattern::new(filename_pattern)
            .map_err(|e| PluginError::configuration(name, e))?;
        let builder = ScanningPluginBuilder::new(name, pattern).recipients(recipients);
        let builder = match rule_file {
            Some(path) => builder.rule_file(path, ReloadPolicy::default()),
            None => builder,
        };
        builder.build()
    }

    pub fn builder(name: &str, filename_pattern: FilenamePattern) -> ScanningPluginBuilder {
        ScanningPluginBuilder::new(name, filename_pattern)
    }

    /// Plugin wired from a settings file: recipients, product, reload policy and
    /// dedup strategy all come from `settings`
    pub fn from_settings(
        name: &str,
        filename_pattern: FilenamePattern,
        rule_file: Option<PathBuf>,
        settings: &PluginSettings,
        dispatcher: Arc<dyn AlertDispatcher>,
    ) -> PluginResult<Self> {
        let builder = ScanningPluginBuilder::new(name, filename_pattern)
            .dispatcher(dispatcher)
            .deduplicator(settings.deduplicator())
            .recipients(settings.recipients().to_vec())
            .product(&settings.product);
        let builder = match rule_file {
            Some(path) => builder.rule_file(path, settings.rules.reload),
            None => builder,
        };
        builder.build()
    }

    /// Apex class scanner: `.cls`/`.apex` files against `rule_file`
    pub fn apex(
        rule_file: PathBuf,
        settings: &PluginSettings,
        dispatcher: Arc<dyn AlertDispatcher>,
    ) -> PluginResult<Self> {
        let pattern = FilenamePattern::from_preset(FilenamePreset::ClsSource)
            .map_err(|e| PluginError::configuration("apex", e))?;
        Self::from_settings("apex", pattern, Some(rule_file), settings, dispatcher)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename_pattern(&self) -> &FilenamePattern {
        &self.filename_pattern
    }

    /// Drop cached rules so the next patch reads the rule file again
    pub fn invalidate_rules(&self) {
        if let Some(loader) = &self.rules {
            loader.invalidate();
        }
    }

    fn load_engine(&self, loader: &dyn RuleEngineLoader) -> PluginResult<Arc<dyn RuleEngine>> {
        loader
            .load()
            .map_err(|e| PluginError::configuration(&self.name, e))
    }

    /// Scan one patch, returning the number of alerts dispatched
    pub async fn handle_patch(&self, repo_name: &str, patch: &PatchEvent) -> PluginResult<usize> {
        if !self.filename_pattern.is_match(&patch.filename) {
            trace!("{}: skipping {}", self.name, patch.filename);
            return Ok(0);
        }
        debug!(
            "{}: filename {} processed ({})",
            self.name, patch.filename, repo_name
        );

        let Some(loader) = &self.rules else {
            debug!("{}: no rule set configured", self.name);
            return Ok(0);
        };
        let engine = self.load_engine(loader.as_ref())?;

        let mut pending = Vec::new();
        engine.match_lines(&patch.added_lines, patch, &mut |m| {
            match m.rule.definition.action {
                RuleAction::Alert => pending.push(PendingAlert {
                    subject: m.rule.label().to_string(),
                    offending_line: m.offending_line.to_string(),
                    severity: m.rule.definition.severity,
                }),
                RuleAction::Disabled => {}
            }
        });

        let mut dispatched = 0;
        for alert in pending {
            if self
                .dispatch_alert(
                    Some(patch),
                    patch.commit(),
                    &alert.subject,
                    &alert.offending_line,
                    alert.severity,
                )
                .await?
            {
                dispatched += 1;
            }
        }
        Ok(dispatched)
    }

    /// Build and send one alert unless it repeats the previous one
    ///
    /// Returns `Ok(false)` for a suppressed duplicate. The dedup marker is updated
    /// before sending and is kept even when the transport fails.
    pub async fn dispatch_alert(
        &self,
        patch: Option<&PatchEvent>,
        commit: &CommitRef,
        subject: &str,
        offending_line: &str,
        severity: Severity,
    ) -> PluginResult<bool> {
        let filename = patch.map_or(NO_FILE, |p| p.filename.as_str());
        let subject = format!(
            "[{} Alert] - {} in {}",
            self.product, subject, commit.identifier
        );

        let identity = AlertIdentity::new(&commit.url, filename, &subject, offending_line);
        if !self.dedup.check_and_remember(&identity) {
            debug!("{}: duplicate alert suppressed: {}", self.name, subject);
            return Ok(false);
        }

        let alert = Alert::new(
            subject.clone(),
            render_text(&commit.url, offending_line, filename),
            render_html(&commit.url, offending_line, filename),
            severity,
        );
        self.dispatcher
            .send(alert, &self.recipients)
            .await
            .map_err(|source| PluginError::Transport { subject, source })?;
        Ok(true)
    }
}

fn render_html(url: &str, offending_line: &str, filename: &str) -> String {
    format!(
        "<a href=\"{url}\">{url}</a><br/><br/>OFFENDING LINE<br/>{}<br/><br/>FILE NAME<br/>{}",
        escape_html(offending_line),
        filename
    )
}

fn render_text(url: &str, offending_line: &str, filename: &str) -> String {
    format!("{url}\n\nOFFENDING LINE\n{offending_line}\n\nFILE NAME\n{filename}")
}

impl std::fmt::Debug for ScanningPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanningPlugin")
            .field("name", &self.name)
            .field("filename_pattern", &self.filename_pattern.describe())
            .field("rules", &self.rules.as_ref().map(|r| r.origin()))
            .field("recipients", &self.recipients)
            .field("product", &self.product)
            .finish()
    }
}

#[async_trait::async_trait]
impl CommitPlugin for ScanningPlugin {
    fn plugin_info(&self) -> PluginInfo {
        PluginInfo {
            name: self.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: format!(
                "Alert on added lines matching regex rules in files matching {}",
                self.filename_pattern.describe()
            ),
            api_version: get_api_version(),
        }
    }

    fn is_compatible(&self, system_api_version: u32) -> bool {
        system_api_version >= get_api_version()
    }

    fn register_watchers(&self, repos: &[RepoConfig]) -> Vec<RepoWatcher> {
        repos
            .iter()
            .map(|repo| {
                let kind = resolve_watcher_kind(repo).unwrap_or_else(|e| {
                    error!("{}", e);
                    WatcherKind::All
                });
                RepoWatcher {
                    plugin_name: self.name.clone(),
                    kind,
                    repo_name: repo.name.clone(),
                }
            })
            .collect()
    }

    async fn commit_started(&self, repo_name: &str, commit: &CommitEvent) -> PluginResult<()> {
        debug!(
            "processing repo {} on commit {}",
            repo_name,
            commit.identifier()
        );
        Ok(())
    }

    async fn patch(&self, repo_name: &str, patch: &PatchEvent) -> PluginResult<()> {
        self.handle_patch(repo_name, patch).await.map(|_| ())
    }

    async fn commit_finished(&self, _repo_name: &str, _commit: &CommitEvent) -> PluginResult<()> {
        Ok(())
    }

    async fn self_test(&self) -> PluginResult<SelfTestReport> {
        let Some(loader) = &self.rules else {
            return Ok(SelfTestReport {
                success: true,
                report: format!("{}: no rule set configured", self.name),
            });
        };

        self_test_rules(&self.name, loader.as_ref())
    }
}

/// Watcher kind for a configured repository, or the error to report for an
/// unsupported type
pub(crate) fn resolve_watcher_kind(repo: &RepoConfig) -> PluginResult<WatcherKind> {
    WatcherKind::from_repo_type(&repo.repo_type).ok_or_else(|| {
        PluginError::UnsupportedRepoType {
            repo_type: repo.repo_type.clone(),
            repo_name: repo.name.clone(),
        }
    })
}

/// Load rules from `loader` and check them against their fixtures
///
/// A rule set that cannot be loaded is a configuration error; failing fixtures
/// are a validation error carrying the report.
pub(crate) fn self_test_rules(
    plugin_name: &str,
    loader: &dyn RuleEngineLoader,
) -> PluginResult<SelfTestReport> {
    let engine = loader
        .load()
        .map_err(|e| PluginError::configuration(plugin_name, e))?;
    let report = engine.self_test();
    debug!("{}: {}", plugin_name, report.report);

    if !report.success {
        return Err(PluginError::Validation {
            plugin_name: plugin_name.to_string(),
            report: report.report,
        });
    }
    Ok(report)
}

/// Builder for [`ScanningPlugin`]
pub struct ScanningPluginBuilder {
    name: String,
    filename_pattern: FilenamePattern,
    rules: Option<Arc<dyn RuleEngineLoader>>,
    dispatcher: Option<Arc<dyn AlertDispatcher>>,
    dedup: Option<Arc<dyn AlertDeduplicator>>,
    recipients: Vec<String>,
    product: String,
}

impl ScanningPluginBuilder {
    pub fn new(name: &str, filename_pattern: FilenamePattern) -> Self {
        Self {
            name: name.to_string(),
            filename_pattern,
            rules: None,
            dispatcher: None,
            dedup: None,
            recipients: Vec::new(),
            product: PluginSettings::DEFAULT_PRODUCT.to_string(),
        }
    }

    /// Load rules from a JSON file with the given reload policy
    pub fn rule_file<P: Into<PathBuf>>(self, path: P, policy: ReloadPolicy) -> Self {
        self.rules(Arc::new(RuleSetLoader::new(path, policy)))
    }

    pub fn rules(mut self, loader: Arc<dyn RuleEngineLoader>) -> Self {
        self.rules = Some(loader);
        self
    }

    pub fn dispatcher(mut self, dispatcher: Arc<dyn AlertDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn deduplicator(mut self, dedup: Arc<dyn AlertDeduplicator>) -> Self {
        self.dedup = Some(dedup);
        self
    }

    pub fn recipients(mut self, recipients: Vec<String>) -> Self {
        self.recipients = recipients;
        self
    }

    pub fn product(mut self, product: &str) -> Self {
        self.product = product.to_string();
        self
    }

    /// Unset dispatcher defaults to [`LogDispatcher`]; unset deduplicator to the
    /// process-wide last-alert marker
    ///
    /// Fails when rules are configured but there is nobody to alert.
    pub fn build(self) -> PluginResult<ScanningPlugin> {
        if self.rules.is_some() && self.recipients.is_empty() {
            return Err(PluginError::configuration(
                &self.name,
                "No alert recipients configured; set email.to",
            ));
        }
        Ok(ScanningPlugin {
            name: self.name,
            filename_pattern: self.filename_pattern,
            rules: self.rules,
            dispatcher: self
                .dispatcher
                .unwrap_or_else(|| Arc::new(LogDispatcher::new()) as Arc<dyn AlertDispatcher>),
            dedup: self
                .dedup
                .unwrap_or_else(|| shared_last_alert() as Arc<dyn AlertDeduplicator>),
            recipients: self.recipients,
            product: self.product,
        })
    }
}
