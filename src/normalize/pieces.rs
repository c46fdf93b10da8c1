//! Merging of pieces groups detected by several passes.

use super::text::fold_group_key;
use crate::model::{PiezasGrupo, PiezasItem};
use std::collections::{HashMap, HashSet};

fn item_key(item: &PiezasItem) -> (String, String, String) {
    (
        item.nombre.to_lowercase(),
        item.tipo.to_lowercase(),
        item.estado.to_lowercase(),
    )
}

/// Merge groups with the same normalized name and dedup their items.
///
/// Group order and item order are first-seen; a merged group keeps the
/// first display name. Groups left without items are dropped.
///
/// ```
/// use manualdoc::model::{PiezasGrupo, PiezasItem};
/// use manualdoc::normalize::pieces::merge_groups;
///
/// let a = PiezasGrupo::with_items("Middleware/OSB", vec![PiezasItem::new("a.jar", "JAR", "Nuevo")]);
/// let b = PiezasGrupo::with_items("middleware / osb", vec![PiezasItem::new("A.JAR", "jar", "nuevo")]);
/// let merged = merge_groups(vec![a, b]);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].items.len(), 1);
/// ```
pub fn merge_groups(groups: Vec<PiezasGrupo>) -> Vec<PiezasGrupo> {
    let mut out: Vec<PiezasGrupo> = Vec::new();
    let mut seen_items: Vec<HashSet<(String, String, String)>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for group in groups {
        let key = fold_group_key(&group.grupo);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key, out.len());
                out.push(PiezasGrupo::new(group.grupo.clone()));
                seen_items.push(HashSet::new());
                out.len() - 1
            }
        };

        for item in group.items {
            if seen_items[slot].insert(item_key(&item)) {
                out[slot].items.push(item);
            }
        }
    }

    out.retain(|g| !g.is_empty());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: &str, t: &str, e: &str) -> PiezasItem {
        PiezasItem::new(n, t, e)
    }

    #[test]
    fn test_merged_count_is_distinct_triples() {
        let a = PiezasGrupo::with_items(
            "RGCARD",
            vec![item("a.sql", "Script SQL", "Nuevo"), item("b.jar", "JAR", "Modificado")],
        );
        let b = PiezasGrupo::with_items(
            "rgcard ",
            vec![
                item("A.SQL", "script sql", "NUEVO"),
                item("c.dtsx", "SSIS Package", "Nuevo"),
                item("b.jar", "JAR", "Nuevo"),
            ],
        );

        let merged = merge_groups(vec![a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].grupo, "RGCARD");
        assert_eq!(merged[0].items.len(), 4);
        assert_eq!(merged[0].items[0].nombre, "a.sql");
        assert_eq!(merged[0].items[3].nombre, "b.jar");
    }

    #[test]
    fn test_group_order_first_seen() {
        let groups = vec![
            PiezasGrupo::with_items("OSB", vec![item("x.wsdl", "WSDL", "Nuevo")]),
            PiezasGrupo::with_items("DB12", vec![item("y.sql", "Script SQL", "Nuevo")]),
            PiezasGrupo::with_items("osb", vec![item("z.xsd", "XSD", "Nuevo")]),
        ];
        let merged = merge_groups(groups);
        let names: Vec<_> = merged.iter().map(|g| g.grupo.as_str()).collect();
        assert_eq!(names, vec!["OSB", "DB12"]);
        assert_eq!(merged[0].items.len(), 2);
    }

    #[test]
    fn test_empty_groups_dropped() {
        let merged = merge_groups(vec![PiezasGrupo::new("Vacío")]);
        assert!(merged.is_empty());
    }
}
