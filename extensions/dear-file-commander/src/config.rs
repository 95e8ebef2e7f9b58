use crate::archive::{ArchiveRegistry, ArchiveRuleSpec, builtin_rule_specs};
use crate::core::{CommanderError, SortConfig};
use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Process-wide defaults for new listing views.
///
/// Examples
/// ```
/// use dear_file_commander::{CommanderConfig, SortConfig, SortDirection, SortKey};
/// let cfg = CommanderConfig::new()
///     .sort(SortConfig::new(SortKey::Time, SortDirection::Descending))
///     .mark_all_includes_dirs(true)
///     .history_capacity(16);
/// assert_eq!(cfg.sort.key, SortKey::Time);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CommanderConfig {
    /// Sort configuration new listings start with.
    pub sort: SortConfig,
    /// Whether "mark all" also marks directories.
    pub mark_all_includes_dirs: bool,
    /// Directories remembered by each listing's history.
    pub history_capacity: usize,
    /// Archive rules in priority order.
    pub archive_rules: Vec<ArchiveRuleSpec>,
}

impl Default for CommanderConfig {
    fn default() -> Self {
        Self {
            sort: SortConfig::default(),
            mark_all_includes_dirs: false,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            archive_rules: builtin_rule_specs(),
        }
    }
}

impl CommanderConfig {
    /// Defaults: name ascending, files-only mark all, built-in archive rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default sort configuration.
    pub fn sort(mut self, sort: SortConfig) -> Self {
        self.sort = sort;
        self
    }

    /// Choose whether "mark all" includes directories.
    pub fn mark_all_includes_dirs(mut self, yes: bool) -> Self {
        self.mark_all_includes_dirs = yes;
        self
    }

    /// Set the history capacity.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Replace the archive rule table.
    pub fn archive_rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = ArchiveRuleSpec>,
    {
        self.archive_rules = rules.into_iter().collect();
        self
    }

    /// Add one archive rule after the existing ones.
    pub fn archive_rule(mut self, rule: ArchiveRuleSpec) -> Self {
        self.archive_rules.push(rule);
        self
    }

    /// Compile the archive rule table.
    pub fn archive_registry(&self) -> Result<ArchiveRegistry, CommanderError> {
        ArchiveRegistry::from_specs(&self.archive_rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_matches_builtin_table() {
        let reg = CommanderConfig::default().archive_registry().unwrap();
        assert_eq!(reg.rules().len(), ArchiveRegistry::builtin().rules().len());
    }

    #[test]
    fn appended_rule_is_used() {
        let cfg = CommanderConfig::new()
            .archive_rules([])
            .archive_rule(ArchiveRuleSpec::new(r"\.cpio$", None, "cpio -id -F ?"));
        let reg = cfg.archive_registry().unwrap();
        assert_eq!(reg.unpack("x.cpio", &[]).unwrap(), "cpio -id -F x.cpio");
    }

    #[test]
    fn invalid_rule_fails_compilation() {
        let cfg = CommanderConfig::new().archive_rule(ArchiveRuleSpec::new("[", None, "x"));
        assert!(matches!(
            cfg.archive_registry(),
            Err(CommanderError::InvalidPattern { .. })
        ));
    }
}
