use std::path::Path;

use regex::Regex;

use crate::core::CommanderError;
use crate::fs::FileSystem;
use crate::marks::name_pattern;
use crate::shell;

/// Built-in rules in priority order: (pattern, pack template, unpack template).
const BUILTIN_RULES: &[(&str, Option<&str>, &str)] = &[
    (r"\.tar\.gz$|\.tgz$", Some("tar czf ? *"), "tar xzf ? *"),
    (r"\.tar\.bz2$|\.tbz2?$", Some("tar cjf ? *"), "tar xjf ? *"),
    (r"\.tar\.xz$|\.txz$", Some("tar cJf ? *"), "tar xJf ? *"),
    (r"\.tar\.zst$", Some("tar --zstd -cf ? *"), "tar --zstd -xf ? *"),
    (r"\.tar$", Some("tar cf ? *"), "tar xf ? *"),
    (r"\.zip$", Some("zip -r ? *"), "unzip ? *"),
    (r"\.7z$", Some("7z a ? *"), "7z x ? *"),
    (r"\.rar$", Some("rar a ? *"), "unrar x ? *"),
    (r"\.gz$", None, "gunzip -k ?"),
    (r"\.bz2$", None, "bunzip2 -k ?"),
    (r"\.xz$", None, "unxz -k ?"),
];

/// Uncompiled archive rule, as stored in configuration.
///
/// Templates are whitespace-separated words; the word `?` stands for the
/// archive path and `*` for the file list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchiveRuleSpec {
    /// Regular expression matched against the archive file name.
    pub pattern: String,
    /// Pack command template; `None` for unpack-only formats.
    pub pack: Option<String>,
    /// Unpack command template.
    pub unpack: String,
}

impl ArchiveRuleSpec {
    /// Create a rule spec.
    pub fn new(pattern: impl Into<String>, pack: Option<&str>, unpack: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            pack: pack.map(str::to_string),
            unpack: unpack.into(),
        }
    }

    /// Compile the pattern.
    pub fn compile(&self) -> Result<ArchiveRule, CommanderError> {
        Ok(ArchiveRule {
            pattern: name_pattern(&self.pattern)?,
            pack_template: self.pack.clone(),
            unpack_template: self.unpack.clone(),
        })
    }
}

/// The built-in rule table in priority order.
pub fn builtin_rule_specs() -> Vec<ArchiveRuleSpec> {
    BUILTIN_RULES
        .iter()
        .map(|(pattern, pack, unpack)| ArchiveRuleSpec::new(*pattern, *pack, *unpack))
        .collect()
}

/// A compiled archive rule.
#[derive(Clone, Debug)]
pub struct ArchiveRule {
    pattern: Regex,
    pack_template: Option<String>,
    unpack_template: String,
}

impl ArchiveRule {
    /// File name pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Pack template, if this format can be created.
    pub fn pack_template(&self) -> Option<&str> {
        self.pack_template.as_deref()
    }

    /// Unpack template.
    pub fn unpack_template(&self) -> &str {
        &self.unpack_template
    }

    /// Length of the leftmost match of the pattern in `name`.
    pub fn match_len(&self, name: &str) -> Option<usize> {
        self.pattern.find(name).map(|m| m.len())
    }

    /// Command that creates `archive` from `files`.
    pub fn pack_command(&self, archive: &str, files: &[&str]) -> Result<String, CommanderError> {
        let template = self.pack_template.as_deref().ok_or_else(|| {
            CommanderError::UnsupportedArchiveFormat(format!(
                "{archive}: packing not supported for /{}/",
                self.pattern.as_str()
            ))
        })?;
        Ok(fill_template(template, archive, files))
    }

    /// Command that extracts `files` from `archive`; an empty list extracts
    /// everything.
    pub fn unpack_command(&self, archive: &str, files: &[&str]) -> String {
        fill_template(&self.unpack_template, archive, files)
    }
}

fn fill_template(template: &str, archive: &str, files: &[&str]) -> String {
    let archive = shell::quote(archive);
    let files = shell::quote_join(files.iter().copied());
    template
        .split_whitespace()
        .map(|word| match word {
            "?" => &*archive,
            "*" => files.as_str(),
            other => other,
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered archive rule table.
///
/// Resolution picks the rule with the longest match span; ties go to the
/// earlier rule.
#[derive(Clone, Debug, Default)]
pub struct ArchiveRegistry {
    rules: Vec<ArchiveRule>,
}

impl ArchiveRegistry {
    /// Registry with the built-in rule table.
    ///
    /// # Panics
    /// If a built-in pattern does not compile.
    pub fn builtin() -> Self {
        match Self::from_specs(&builtin_rule_specs()) {
            Ok(registry) => registry,
            Err(err) => panic!("built-in archive rule table is invalid: {err}"),
        }
    }

    /// Compile a registry from rule specs, keeping their order.
    pub fn from_specs(specs: &[ArchiveRuleSpec]) -> Result<Self, CommanderError> {
        let rules = specs
            .iter()
            .map(ArchiveRuleSpec::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Append a rule (lowest priority).
    pub fn push_rule(&mut self, rule: ArchiveRule) {
        self.rules.push(rule);
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[ArchiveRule] {
        &self.rules
    }

    /// Resolve a rule for an archive file name.
    pub fn resolve(&self, name: &str) -> Option<&ArchiveRule> {
        let mut best: Option<(usize, &ArchiveRule)> = None;
        for rule in &self.rules {
            let Some(len) = rule.match_len(name) else {
                continue;
            };
            if best.is_none_or(|(best_len, _)| len > best_len) {
                best = Some((len, rule));
            }
        }
        let found = best.map(|(_, rule)| rule);
        trace_archive_resolved(name, found);
        found
    }

    /// Resolve a rule for `path`, asking `fs` whether it exists.
    ///
    /// Existing paths that are not regular files (directories included) are
    /// never archives. Paths that do not exist yet resolve by name, which is
    /// what packing needs.
    pub fn resolve_path(&self, fs: &dyn FileSystem, path: &Path) -> Option<&ArchiveRule> {
        if let Ok(md) = fs.metadata(path) {
            if !md.is_file {
                return None;
            }
        }
        let name = path.file_name()?.to_string_lossy();
        self.resolve(&name)
    }

    /// Pack command for `archive`, resolved by its name.
    pub fn pack(&self, archive: &str, files: &[&str]) -> Result<String, CommanderError> {
        self.resolve_required(archive)?.pack_command(archive, files)
    }

    /// Unpack command for `archive`, resolved by its name.
    pub fn unpack(&self, archive: &str, files: &[&str]) -> Result<String, CommanderError> {
        Ok(self.resolve_required(archive)?.unpack_command(archive, files))
    }

    fn resolve_required(&self, archive: &str) -> Result<&ArchiveRule, CommanderError> {
        let name = Path::new(archive)
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| archive.into());
        self.resolve(&name).ok_or_else(|| {
            CommanderError::UnsupportedArchiveFormat(format!("{archive}: no matching archive rule"))
        })
    }
}

#[cfg(feature = "tracing")]
fn trace_archive_resolved(name: &str, rule: Option<&ArchiveRule>) {
    tracing::debug!(
        event = "archive.resolved",
        name,
        pattern = rule.map(|r| r.pattern.as_str()),
        "archive rule resolved"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_archive_resolved(_name: &str, _rule: Option<&ArchiveRule>) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(specs: &[(&str, Option<&str>, &str)]) -> ArchiveRegistry {
        let specs: Vec<ArchiveRuleSpec> = specs
            .iter()
            .map(|(p, pack, unpack)| ArchiveRuleSpec::new(*p, *pack, *unpack))
            .collect();
        ArchiveRegistry::from_specs(&specs).unwrap()
    }

    #[test]
    fn longest_match_beats_list_order() {
        let reg = registry(&[
            (r"\.gz$", None, "gunzip ?"),
            (r"\.tar\.gz$", Some("tar czf ? *"), "tar xzf ? *"),
        ]);
        let rule = reg.resolve("archive.tar.gz").unwrap();
        assert_eq!(rule.pattern().as_str(), r"\.tar\.gz$");
        let rule = reg.resolve("notes.gz").unwrap();
        assert_eq!(rule.pattern().as_str(), r"\.gz$");
        assert!(reg.resolve("notes.txt").is_none());
    }

    #[test]
    fn equal_match_length_keeps_first_rule() {
        let reg = registry(&[(r"\.zip$", Some("zip ? *"), "unzip ? *"), (r"\.zip$", None, "other ?")]);
        assert_eq!(reg.resolve("a.zip").unwrap().unpack_template(), "unzip ? *");
    }

    #[test]
    fn pack_fills_archive_and_files() {
        let reg = ArchiveRegistry::builtin();
        let cmd = reg.pack("out.tar.gz", &["a.txt", "my dir"]).unwrap();
        assert_eq!(cmd, "tar czf out.tar.gz a.txt 'my dir'");
    }

    #[test]
    fn unpack_without_files_extracts_everything() {
        let reg = ArchiveRegistry::builtin();
        assert_eq!(reg.unpack("in.zip", &[]).unwrap(), "unzip in.zip");
        assert_eq!(reg.unpack("in.zip", &["x"]).unwrap(), "unzip in.zip x");
        assert_eq!(reg.unpack("/tmp/log.gz", &[]).unwrap(), "gunzip -k /tmp/log.gz");
    }

    #[test]
    fn unpack_only_formats_refuse_to_pack() {
        let reg = ArchiveRegistry::builtin();
        let err = reg.pack("log.gz", &["log"]).unwrap_err();
        assert!(matches!(err, CommanderError::UnsupportedArchiveFormat(_)));
        let err = reg.unpack("notes.txt", &[]).unwrap_err();
        assert!(matches!(err, CommanderError::UnsupportedArchiveFormat(_)));
    }

    #[test]
    fn builtin_table_compiles_completely() {
        assert!(ArchiveRegistry::from_specs(&builtin_rule_specs()).is_ok());
        assert_eq!(ArchiveRegistry::builtin().rules().len(), BUILTIN_RULES.len());
    }

    #[test]
    fn bad_pattern_is_reported() {
        let err = ArchiveRegistry::from_specs(&[ArchiveRuleSpec::new("(", None, "x ?")]).unwrap_err();
        assert!(matches!(err, CommanderError::InvalidPattern { .. }));
    }
}
