use super::model::Persona;
use super::preset::builtin_personas;
use crate::error::{CatalogError, EngineError};
use crate::scenario::ScenarioCatalog;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Immutable persona lookup, fully loaded before any session starts.
#[derive(Debug, Clone, Default)]
pub struct PersonaStore {
    personas: BTreeMap<String, Arc<Persona>>,
}

impl PersonaStore {
    /// Builds a store, rejecting duplicate ids and personas whose scenario is
    /// missing from `scenarios`.
    pub fn new(
        personas: impl IntoIterator<Item = Persona>,
        scenarios: &ScenarioCatalog,
    ) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for persona in personas {
            if !scenarios.contains(&persona.scenario) {
                return Err(CatalogError::UnknownScenario {
                    persona_id: persona.id,
                    scenario: persona.scenario,
                });
            }
            if map.contains_key(&persona.id) {
                return Err(CatalogError::DuplicatePersona(persona.id));
            }
            map.insert(persona.id.clone(), Arc::new(persona));
        }
        Ok(Self { personas: map })
    }

    /// The built-in personas. Always consistent with [`ScenarioCatalog::builtin`].
    pub fn builtin() -> Self {
        let personas = builtin_personas()
            .into_iter()
            .map(|p| (p.id.clone(), Arc::new(p)))
            .collect();
        Self { personas }
    }

    /// Loads a JSON array of personas from `path`.
    pub fn from_json_file(
        path: impl AsRef<Path>,
        scenarios: &ScenarioCatalog,
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let personas: Vec<Persona> = serde_json::from_str(&raw)?;
        let store = Self::new(personas, scenarios)?;
        info!(path = %path.display(), count = store.len(), "Loaded persona catalog");
        Ok(store)
    }

    pub fn get(&self, id: &str) -> Result<Arc<Persona>, EngineError> {
        self.personas
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::persona_not_found(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Persona>> {
        self.personas.values()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}
