use crate::rules::{parse_rule_json, ScheduleRule};
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persistance de la configuration des règles (jamais des plannings générés).
pub trait RuleStorage {
    /// Charge et valide la règle.
    fn load(&self) -> anyhow::Result<ScheduleRule>;
    /// Sauvegarde de manière atomique.
    fn save(&self, rule: &ScheduleRule) -> anyhow::Result<()>;
}

pub struct JsonRuleStorage {
    path: PathBuf,
}

impl JsonRuleStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Règle stockée, ou règle par défaut si le fichier n'existe pas encore.
    pub fn load_or_default(&self) -> anyhow::Result<ScheduleRule> {
        if !self.path.exists() {
            return Ok(ScheduleRule::default());
        }
        self.load()
    }
}

impl RuleStorage for JsonRuleStorage {
    fn load(&self) -> anyhow::Result<ScheduleRule> {
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let rule = parse_rule_json(&data)
            .with_context(|| format!("parsing rule {}", self.path.display()))?;
        Ok(rule)
    }

    fn save(&self, rule: &ScheduleRule) -> anyhow::Result<()> {
        rule.validate()?;
        let json = serde_json::to_vec_pretty(rule)?;
        let mut tmp = NamedTempFile::new_in(self.path.parent().unwrap_or_else(|| Path::new(".")))
            .with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
