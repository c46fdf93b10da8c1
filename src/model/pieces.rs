//! Deliverable pieces and their groups.

use serde::{Deserialize, Serialize};

/// A deliverable artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiezasItem {
    /// File name
    pub nombre: String,
    /// Category label, e.g. "Script SQL"
    pub tipo: String,
    /// "Nuevo", "Modificado" or free text
    pub estado: String,
}

impl PiezasItem {
    /// Create an item.
    pub fn new(
        nombre: impl Into<String>,
        tipo: impl Into<String>,
        estado: impl Into<String>,
    ) -> Self {
        Self {
            nombre: nombre.into(),
            tipo: tipo.into(),
            estado: estado.into(),
        }
    }

    /// Check if all three values are empty.
    pub fn is_blank(&self) -> bool {
        self.nombre.is_empty() && self.tipo.is_empty() && self.estado.is_empty()
    }
}

/// A named collection of pieces, usually one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiezasGrupo {
    pub grupo: String,
    #[serde(default)]
    pub items: Vec<PiezasItem>,
}

impl PiezasGrupo {
    /// Create an empty group.
    pub fn new(grupo: impl Into<String>) -> Self {
        Self {
            grupo: grupo.into(),
            items: Vec::new(),
        }
    }

    /// Create a group with items.
    pub fn with_items(grupo: impl Into<String>, items: Vec<PiezasItem>) -> Self {
        Self {
            grupo: grupo.into(),
            items,
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the group has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
