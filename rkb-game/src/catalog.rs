//! Static game content: tile, goal and task names plus expansion links.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

const DEFAULT_CATALOG_DATA: &str = include_str!("../data/catalog.json");

/// A box of tiles and cards: the base game or a full expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExpansionInfo {
    pub id: String,
    pub name: String,
    pub href: String,
    /// Location tiles, shown as the link title.
    #[serde(default)]
    pub locations: String,
    #[serde(default)]
    pub boards: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<String>,
}

/// Secondary link shown after a mini expansion's controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraLink {
    pub name: String,
    pub href: String,
}

/// A mini expansion: a rule overlay triggered by particular boards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MiniSpec {
    pub id: String,
    pub name: String,
    pub href: String,
    pub usage_href: String,
    #[serde(default)]
    pub extra: Option<ExtraLink>,
    /// Boards the overlay applies to (or is triggered by).
    #[serde(default)]
    pub boards: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub base: ExpansionInfo,
    #[serde(default)]
    pub expansions: Vec<ExpansionInfo>,
    #[serde(default)]
    pub minis: Vec<MiniSpec>,
}

impl Catalog {
    /// Parse a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_CATALOG_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn expansion(&self, id: &str) -> Option<&ExpansionInfo> {
        self.expansions.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn mini(&self, id: &str) -> Option<&MiniSpec> {
        self.minis.iter().find(|m| m.id == id)
    }
}

#[must_use]
pub fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(Catalog::load_from_static)
}

/// Catalog entry for a full expansion, or an empty entry carrying the id.
pub(crate) fn expansion_info(id: &str) -> ExpansionInfo {
    catalog().expansion(id).cloned().unwrap_or_else(|| {
        log::warn!("no catalog entry for expansion '{id}'");
        ExpansionInfo {
            id: id.to_string(),
            name: id.to_string(),
            ..ExpansionInfo::default()
        }
    })
}

/// Catalog entry for a mini expansion, or an empty entry carrying the id.
pub(crate) fn mini_spec(id: &str) -> MiniSpec {
    catalog().mini(id).cloned().unwrap_or_else(|| {
        log::warn!("no catalog entry for mini expansion '{id}'");
        MiniSpec {
            id: id.to_string(),
            name: id.to_string(),
            ..MiniSpec::default()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_catalog_parses() {
        let parsed = Catalog::from_json(DEFAULT_CATALOG_DATA).unwrap();
        assert_eq!(parsed.base.boards.len(), 8);
        assert_eq!(parsed.base.goals.len(), 10);
        assert_eq!(&parsed, catalog());
    }

    #[test]
    fn expansions_keep_declaration_order() {
        let ids: Vec<_> = catalog().expansions.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["nomads", "crossroads", "marshlands", "harvest"]);
        let minis: Vec<_> = catalog().minis.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(minis, vec!["island", "caves", "capitol"]);
    }

    #[test]
    fn crossroads_carries_tasks_and_no_goals() {
        let crossroads = catalog().expansion("crossroads").unwrap();
        assert_eq!(crossroads.tasks.len(), 6);
        assert!(crossroads.goals.is_empty());
    }

    #[test]
    fn mini_boards_match_rules() {
        assert_eq!(catalog().mini("capitol").unwrap().boards, vec!["Oracle", "Harbor"]);
        assert_eq!(catalog().mini("caves").unwrap().boards, vec!["Tavern"]);
        assert!(catalog().mini("caves").unwrap().extra.is_some());
        assert_eq!(catalog().mini("island").unwrap().boards, vec!["Harbor", "Lighthouse"]);
    }

    #[test]
    fn unknown_ids_fall_back_to_empty_entries() {
        assert!(catalog().expansion("atlantis").is_none());
        let info = expansion_info("atlantis");
        assert_eq!(info.id, "atlantis");
        assert!(info.boards.is_empty());
        assert!(mini_spec("volcano").boards.is_empty());
    }
}
