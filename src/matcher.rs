//! Folder name matching
//!
//! Resolves a client display name against indexed folder names using an
//! accent/case/separator-insensitive substring test. Folder names come from
//! operators typing into Drive, client names from the host page, so the two
//! never agree on casing, diacritics or punctuation.

use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::index::IndexedGroup;

/// A resolved destination folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderMatch {
    pub folder_id: String,
    /// Folder name as it appears in Drive
    pub folder_name: String,
    /// Name of the group the match came from
    pub group: String,
}

/// Fold a display name to its comparable form: canonical decomposition with
/// combining marks dropped, the ligatures Unicode does not decompose mapped
/// by hand, lowercased, and commas, hyphens and whitespace removed.
///
/// "Mélançon-Dupré" becomes "melancondupre".
pub fn normalize_name(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for c in name.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match c {
            'œ' => folded.push_str("oe"),
            'Œ' => folded.push_str("OE"),
            'æ' => folded.push_str("ae"),
            'Æ' => folded.push_str("AE"),
            _ => folded.push(c),
        }
    }
    folded
        .to_lowercase()
        .chars()
        .filter(|c| *c != ',' && *c != '-' && !c.is_whitespace())
        .collect()
}

/// Find the folder for a client name.
///
/// Groups are visited in the order given, indices within a group in their
/// declared parent order, and folder entries in API response order. The first
/// folder whose normalized name contains the normalized client name wins and
/// short-circuits every remaining group. The direction matters: the folder
/// name contains the client name, so client "Dupont" matches a folder named
/// "Succession Dupont Jean" but not the other way around.
pub fn resolve(client_name: &str, groups: &[IndexedGroup]) -> Option<FolderMatch> {
    let needle = normalize_name(client_name);

    for group in groups {
        for index in &group.indices {
            for entry in index.entries() {
                if entry.normalized.contains(&needle) {
                    debug!(
                        "Client '{}' matched folder '{}' in group '{}'",
                        client_name, entry.name, group.name
                    );
                    return Some(FolderMatch {
                        folder_id: entry.id.clone(),
                        folder_name: entry.name.clone(),
                        group: group.name.clone(),
                    });
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupRole;
    use crate::index::FolderIndex;

    fn index_of(entries: &[(&str, &str)]) -> FolderIndex {
        let mut index = FolderIndex::new();
        for (name, id) in entries {
            index.insert(name.to_string(), id.to_string());
        }
        index
    }

    fn group(name: &str, indices: Vec<FolderIndex>) -> IndexedGroup {
        IndexedGroup {
            name: name.to_string(),
            role: GroupRole::Intake,
            indices,
        }
    }

    #[test]
    fn test_normalize_strips_accents() {
        assert_eq!(normalize_name("Mélançon-Dupré"), "melancondupre");
        assert_eq!(normalize_name("Noël"), "noel");
        assert_eq!(normalize_name("FRANÇOIS"), "francois");
    }

    #[test]
    fn test_normalize_ligatures() {
        assert_eq!(normalize_name("Lefœvre"), "lefoevre");
        assert_eq!(normalize_name("ŒUVRE"), "oeuvre");
        assert_eq!(normalize_name("Ægir"), "aegir");
    }

    #[test]
    fn test_normalize_drops_separators() {
        assert_eq!(normalize_name("de la Tour, Jean-Pierre"), "delatourjeanpierre");
        assert_eq!(normalize_name("  Dupont  "), "dupont");
    }

    #[test]
    fn test_resolve_folder_contains_client() {
        let groups = vec![group("intake", vec![index_of(&[
            ("Succession Dupont Jean", "f1"),
        ])])];

        let found = resolve("Dupont", &groups);
        assert_eq!(found.map(|m| m.folder_id), Some("f1".to_string()));
    }

    #[test]
    fn test_resolve_direction_is_asymmetric() {
        // The folder name must contain the client name, not the reverse.
        let groups = vec![group("intake", vec![index_of(&[("Dup", "f1")])])];
        assert!(resolve("Dupont", &groups).is_none());
    }

    #[test]
    fn test_resolve_accent_and_case_insensitive() {
        let groups = vec![group("intake", vec![index_of(&[
            ("Succession MELANCON DUPRE", "f9"),
        ])])];

        let found = resolve("Mélançon-Dupré", &groups);
        assert_eq!(found.map(|m| m.folder_id), Some("f9".to_string()));
    }

    #[test]
    fn test_resolve_prefers_earlier_group() {
        let first = group("intake", vec![index_of(&[("Dupont Marie", "a")])]);
        let second = group("processed", vec![index_of(&[("Dupont Marie", "b")])]);

        let found = resolve("dupont", &[first, second]);
        let matched = found.expect("should match");
        assert_eq!(matched.folder_id, "a");
        assert_eq!(matched.group, "intake");
    }

    #[test]
    fn test_resolve_first_entry_wins_within_index() {
        let groups = vec![group("intake", vec![index_of(&[
            ("Dossier Martin Paul", "first"),
            ("Dossier Martin Pierre", "second"),
        ])])];

        let found = resolve("Martin", &groups);
        assert_eq!(found.map(|m| m.folder_id), Some("first".to_string()));
    }

    #[test]
    fn test_resolve_walks_indices_in_parent_order() {
        let groups = vec![group("intake", vec![
            index_of(&[("Unrelated", "x")]),
            index_of(&[("Succession Garnier", "y")]),
        ])];

        let found = resolve("Garnier", &groups);
        assert_eq!(found.map(|m| m.folder_id), Some("y".to_string()));
    }

    #[test]
    fn test_resolve_no_match() {
        let groups = vec![group("intake", vec![index_of(&[("Bernard", "f1")])])];
        assert!(resolve("Rousseau", &groups).is_none());
    }
}
