use std::collections::BTreeMap;
use std::sync::Arc;

use tether_core::types::ScriptLanguage;

use super::{ScriptError, ScriptRunner};

/// Script runners keyed by language.
#[derive(Clone, Default)]
pub struct ScriptRegistry {
    runners: BTreeMap<&'static str, Arc<dyn ScriptRunner>>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, runner: Arc<dyn ScriptRunner>) -> Result<(), ScriptError> {
        let language = runner.language();
        if self.runners.contains_key(language.as_str()) {
            return Err(ScriptError::AlreadyRegistered(language));
        }
        self.runners.insert(language.as_str(), runner);
        Ok(())
    }

    pub fn get_plugin(&self, language: ScriptLanguage) -> Option<Arc<dyn ScriptRunner>> {
        self.runners.get(language.as_str()).cloned()
    }

    /// Looks a runner up by language name; unknown names fail here rather than at call time.
    pub fn get_plugin_by_name(&self, name: &str) -> Result<Arc<dyn ScriptRunner>, ScriptError> {
        let language: ScriptLanguage = name
            .parse()
            .map_err(|_| ScriptError::UnknownLanguage(name.to_string()))?;
        self.get_plugin(language)
            .ok_or(ScriptError::RunnerUnavailable(language))
    }

    pub fn languages(&self) -> Vec<&'static str> {
        self.runners.keys().copied().collect()
    }
}

impl std::fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptRegistry")
            .field("languages", &self.languages())
            .finish()
    }
}
