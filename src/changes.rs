//! Repository change records as pieces.
//!
//! The records come from a version-control status scan done elsewhere; this
//! module only maps them onto the pieces model.

use crate::catalog::{file_extension, piece_type_for_extension};
use crate::model::{PiezasGrupo, PiezasItem};
use crate::normalize::status::{MODIFICADO, NUEVO};
use serde::{Deserialize, Serialize};

/// Status written for deleted files.
pub const ELIMINADO: &str = "Eliminado";

/// Type written for files without an extension.
pub const TIPO_ARCHIVO: &str = "Archivo";

/// Kind of change reported for a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Untracked,
    Renamed,
    Copied,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ChangeKind {
    /// Piece status for this kind of change.
    pub fn estado(&self) -> &'static str {
        match self {
            ChangeKind::Added | ChangeKind::Untracked => NUEVO,
            ChangeKind::Deleted => ELIMINADO,
            _ => MODIFICADO,
        }
    }
}

/// One changed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoChange {
    /// Path relative to the repository root
    pub path: String,
    #[serde(default)]
    pub kind: ChangeKind,
    /// Previous path of a rename or copy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename_from: Option<String>,
    #[serde(default)]
    pub conflicted: bool,
}

impl RepoChange {
    /// Create a change record.
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            rename_from: None,
            conflicted: false,
        }
    }

    /// Last path component.
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .find(|s| !s.is_empty())
            .unwrap_or(&self.path)
    }

    /// Map the change to a piece.
    ///
    /// ```
    /// use manualdoc::changes::{ChangeKind, RepoChange};
    ///
    /// let item = RepoChange::new("db/scripts/alta.sql", ChangeKind::Untracked).to_piece();
    /// assert_eq!(item.nombre, "alta.sql");
    /// assert_eq!(item.tipo, "Script SQL");
    /// assert_eq!(item.estado, "Nuevo");
    /// ```
    pub fn to_piece(&self) -> PiezasItem {
        let name = self.file_name();
        let tipo = file_extension(name)
            .map(|ext| piece_type_for_extension(&ext))
            .unwrap_or_else(|| TIPO_ARCHIVO.to_string());
        PiezasItem::new(name, tipo, self.kind.estado())
    }
}

/// Changes of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStatus {
    pub repo_name: String,
    #[serde(default)]
    pub repo_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default)]
    pub changes: Vec<RepoChange>,
}

impl RepoStatus {
    /// Map the repository to a pieces group named after it.
    pub fn to_group(&self) -> PiezasGrupo {
        PiezasGrupo::with_items(
            self.repo_name.clone(),
            self.changes.iter().map(RepoChange::to_piece).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_by_kind() {
        assert_eq!(ChangeKind::Added.estado(), "Nuevo");
        assert_eq!(ChangeKind::Untracked.estado(), "Nuevo");
        assert_eq!(ChangeKind::Deleted.estado(), "Eliminado");
        assert_eq!(ChangeKind::Renamed.estado(), "Modificado");
        assert_eq!(ChangeKind::Unknown.estado(), "Modificado");
    }

    #[test]
    fn test_piece_without_extension() {
        let item = RepoChange::new("scripts\\Makefile", ChangeKind::Modified).to_piece();
        assert_eq!(item, PiezasItem::new("Makefile", "Archivo", "Modificado"));
    }

    #[test]
    fn test_group_from_json() {
        let json = r#"{
            "repoName": "RGCARD",
            "repoPath": "/src/rgcard",
            "changes": [
                {"path": "src/app.jar", "kind": "added"},
                {"path": "old.pkb", "kind": "deleted", "renameFrom": "older.pkb"},
                {"path": "x.yml", "kind": "typechange"}
            ]
        }"#;
        let status: RepoStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.changes[2].kind, ChangeKind::Unknown);

        let group = status.to_group();
        assert_eq!(group.grupo, "RGCARD");
        assert_eq!(group.items[0], PiezasItem::new("app.jar", "JAR", "Nuevo"));
        assert_eq!(group.items[1].estado, "Eliminado");
        assert_eq!(group.items[2].tipo, "YAML");
    }
}
