//! Localized notification messages
//!
//! Every user-facing notification is a [`MessageKind`] backed by a static
//! per-locale table. Lookups fall back to [`FALLBACK_LANGUAGE`].

use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// Language used when the current one has no entry.
pub const FALLBACK_LANGUAGE: &str = "en_US";

/// Language selected before the user picks one.
pub const DEFAULT_LANGUAGE: &str = "es_ES";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    NodeDeletedSuccess,
    CannotDeleteParent,
    FailedToCreateNode,
    FailedToDeleteNode,
    NoChildren,
    FailedToLoadChildren,
    NodeCreatedSuccess,
}

impl MessageKind {
    pub const ALL: [MessageKind; 7] = [
        MessageKind::NodeDeletedSuccess,
        MessageKind::CannotDeleteParent,
        MessageKind::FailedToCreateNode,
        MessageKind::FailedToDeleteNode,
        MessageKind::NoChildren,
        MessageKind::FailedToLoadChildren,
        MessageKind::NodeCreatedSuccess,
    ];

    /// Stable string key of this message.
    pub fn key(&self) -> &'static str {
        match self {
            MessageKind::NodeDeletedSuccess => "nodeDeletedSuccess",
            MessageKind::CannotDeleteParent => "cannotDeleteParent",
            MessageKind::FailedToCreateNode => "failedToCreateNode",
            MessageKind::FailedToDeleteNode => "failedToDeleteNode",
            MessageKind::NoChildren => "noChildren",
            MessageKind::FailedToLoadChildren => "failedToLoadChildren",
            MessageKind::NodeCreatedSuccess => "nodeCreatedSuccess",
        }
    }

    /// Text for `lang`, without fallback.
    pub fn text(&self, lang: &str) -> Option<&'static str> {
        use MessageKind::*;

        let text = match (self, lang) {
            (NodeDeletedSuccess, "en_US") => "Node deleted successfully.",
            (NodeDeletedSuccess, "es_ES") => "Nodo eliminado correctamente.",
            (NodeDeletedSuccess, "fr_FR") => "Nœud supprimé avec succès.",
            (NodeDeletedSuccess, "de_DE") => "Knoten erfolgreich gelöscht.",
            (NodeDeletedSuccess, "it_IT") => "Nodo eliminato correttamente.",

            (CannotDeleteParent, "en_US") => "Can't delete a parent node.",
            (CannotDeleteParent, "es_ES") => "No se puede eliminar un nodo padre.",
            (CannotDeleteParent, "fr_FR") => "Impossible de supprimer un nœud parent.",
            (CannotDeleteParent, "de_DE") => "Elternknoten kann nicht gelöscht werden.",
            (CannotDeleteParent, "it_IT") => "Impossibile eliminare un nodo padre.",

            (FailedToCreateNode, "en_US") => "Failed to create node.",
            (FailedToCreateNode, "es_ES") => "Error al crear el nodo.",
            (FailedToCreateNode, "fr_FR") => "Échec de la création du nœud.",
            (FailedToCreateNode, "de_DE") => "Fehler beim Erstellen des Knotens.",
            (FailedToCreateNode, "it_IT") => "Errore durante la creazione del nodo.",

            (FailedToDeleteNode, "en_US") => "Failed to delete node.",
            (FailedToDeleteNode, "es_ES") => "Error al eliminar el nodo.",
            (FailedToDeleteNode, "fr_FR") => "Échec de la suppression du nœud.",
            (FailedToDeleteNode, "de_DE") => "Fehler beim Löschen des Knotens.",
            (FailedToDeleteNode, "it_IT") => "Errore durante l’eliminazione del nodo.",

            (NoChildren, "en_US") => "This node has no children.",
            (NoChildren, "es_ES") => "Este nodo no tiene hijos.",
            (NoChildren, "fr_FR") => "Ce nœud n’a pas d’enfants.",
            (NoChildren, "de_DE") => "Dieser Knoten hat keine Kinder.",
            (NoChildren, "it_IT") => "Questo nodo non ha figli.",

            (FailedToLoadChildren, "en_US") => "Failed to load children.",
            (FailedToLoadChildren, "es_ES") => "Error al cargar los hijos.",
            (FailedToLoadChildren, "fr_FR") => "Échec du chargement des enfants.",
            (FailedToLoadChildren, "de_DE") => "Fehler beim Laden der Kinder.",
            (FailedToLoadChildren, "it_IT") => "Errore durante il caricamento dei figli.",

            (NodeCreatedSuccess, "en_US") => "Node created successfully!",
            (NodeCreatedSuccess, "es_ES") => "¡Nodo creado correctamente!",
            (NodeCreatedSuccess, "fr_FR") => "Nœud créé avec succès !",
            (NodeCreatedSuccess, "de_DE") => "Knoten erfolgreich erstellt!",
            (NodeCreatedSuccess, "it_IT") => "Nodo creato correttamente!",

            _ => return None,
        };
        Some(text)
    }

    /// Text for `lang`, falling back to [`FALLBACK_LANGUAGE`].
    pub fn localized(&self, lang: &str) -> &'static str {
        self.text(lang)
            .or_else(|| self.text(FALLBACK_LANGUAGE))
            .unwrap_or_else(|| self.key())
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MessageKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKind::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| DomainError::UnknownMessageKey(s.to_string()))
    }
}

/// Resolve a message by its string key.
///
/// Unknown keys yield `Missing translation for <key>`.
pub fn notification_text(key: &str, lang: &str) -> String {
    match key.parse::<MessageKind>() {
        Ok(kind) => kind.localized(lang).to_string(),
        Err(_) => format!("Missing translation for {key}"),
    }
}
