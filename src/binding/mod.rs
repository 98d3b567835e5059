//! Modul für vorgeschlagene Bindings und deren Auflösung auf die erkannte Hardware.
//!
//! Die Anwendung schlägt pro Interaction-Profil eine Liste von (Action, Pfad)-Paaren vor.
//! Sobald der Controller einer Hand erkannt ist, wählt der Resolver das passende Profil
//! und eine [`BindingStrategy`] hängt die Actions an die Felder des Snapshots.

pub mod component;
pub mod profile;
pub mod strategy;

pub use component::{resolve_component, Component};
pub use profile::{AimPose, ControllerKind, InteractionProfile};
pub use strategy::{BindingStrategy, MappingTable, ProfileMapping};

use crate::action::ActionHandle;
use crate::error::ActionError;
use crate::path::Path;
use std::collections::HashMap;
use tracing::debug;

/// Ein vorgeschlagenes Binding: Action plus vollständiger Quellpfad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedBinding {
    pub action: ActionHandle,
    pub binding: Path,
}

/// Vorschläge je Interaction-Profil
///
/// Nach dem ersten Attach wird der Speicher versiegelt und nimmt keine Vorschläge mehr an.
#[derive(Debug, Default)]
pub struct BindingSuggestionStore {
    suggestions: HashMap<Path, Vec<SuggestedBinding>>,
    sealed: bool,
}

impl BindingSuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ersetzt die Liste für `profile` komplett
    pub fn suggest(
        &mut self,
        profile: Path,
        bindings: Vec<SuggestedBinding>,
    ) -> Result<(), ActionError> {
        if self.sealed {
            return Err(ActionError::AlreadyAttached);
        }

        debug!("{} suggested bindings for profile {}", bindings.len(), profile);
        self.suggestions.insert(profile, bindings);
        Ok(())
    }

    pub fn get(&self, profile: Path) -> Option<&[SuggestedBinding]> {
        self.suggestions.get(&profile).map(Vec::as_slice)
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }
}
