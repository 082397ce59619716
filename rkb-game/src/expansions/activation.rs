//! The expansions sidebar and the checkbox state every expansion reads.
//!
//! Full expansions get a checkbox next to a link to the box. Mini expansions
//! additionally get a pair of radios choosing between the official usage
//! rule and a plain percentage chance.

use std::fmt;

use crate::cards::Randomizer;
use crate::catalog::{ExpansionInfo, MiniSpec, catalog};
use crate::error::SetupResult;
use crate::page::{ElementSpec, FieldHandle, Page, Placement, checked_checkbox, locate, require_page};
use crate::state::{ConfigState, Pools};

/// Id of the list every expansion entry is appended to.
pub const EXPANSION_LIST: &str = "expansionList";

/// Default percentage for a mini expansion in odds mode.
pub const DEFAULT_ODDS: &str = "50";

/// How a checked mini expansion decides whether it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleType {
    /// Apply whenever a qualifying board is drawn.
    Rules,
    /// Apply with the configured percentage chance.
    Odds,
}

impl RuleType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Odds => "odds",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ensure the sidebar, the expansions list and the base checkbox exist.
///
/// # Errors
///
/// Returns [`crate::SetupError::MissingContext`] without a page, or
/// [`crate::SetupError::MissingSection`] when the page has no `content`
/// section to hang the sidebar off.
pub fn init(page: Option<&mut dyn Page>, state: ConfigState) -> SetupResult<ConfigState> {
    ensure_sidebar(require_page(page)?, state)
}

/// [`init`] for callers already holding the page.
///
/// # Errors
///
/// Returns [`crate::SetupError::MissingSection`] when the page has no
/// `content` section.
pub fn ensure_sidebar(page: &mut dyn Page, mut state: ConfigState) -> SetupResult<ConfigState> {
    if !page.contains(".sidebar") {
        page.insert(ElementSpec::new("div").class("sidebar"), Placement::after(".content"))?;
    }
    if !page.contains(".expansions") {
        let section = ElementSpec::new("div")
            .class("expansions")
            .child(ElementSpec::new("h3").text("EXPANSIONS"))
            .child(ElementSpec::new("ul").id(EXPANSION_LIST));
        page.insert(section, Placement::append(".sidebar"))?;
    }
    let base = add_expansion_entry(page, &catalog().base)?;
    state.fields.insert("base", base);
    Ok(state)
}

/// Add the checkbox and link for a full expansion, once.
///
/// # Errors
///
/// Returns [`crate::SetupError::MissingSection`] when the expansions list
/// has not been built.
pub fn add_expansion_entry(page: &mut dyn Page, info: &ExpansionInfo) -> SetupResult<FieldHandle> {
    if !page.contains(&info.id) {
        let link = ElementSpec::new("a")
            .attr("href", &info.href)
            .class(&info.id)
            .attr("title", &info.locations)
            .text(&info.name);
        let entry = ElementSpec::new("li")
            .child(checked_checkbox(&info.id))
            .child(link);
        page.insert(entry, Placement::append(EXPANSION_LIST))?;
    }
    locate(page, &info.id)
}

/// Registered part names whose checkbox is checked; the base game when none is.
#[must_use]
pub fn active_types(state: &ConfigState, page: &dyn Page) -> Vec<String> {
    let active: Vec<String> = state
        .names
        .iter()
        .filter(|name| page.is_checked(name))
        .cloned()
        .collect();
    if active.is_empty() {
        return vec!["base".to_string()];
    }
    active
}

/// First active part whose pool in `section` holds `item`.
#[must_use]
pub fn find_expansion(item: &str, section: &Pools, state: &ConfigState, page: &dyn Page) -> Option<String> {
    active_types(state, page)
        .into_iter()
        .find(|kind| section.holds(kind, item))
}

fn rules_id(id: &str) -> String {
    format!("{id}Rules")
}

fn odds_id(id: &str) -> String {
    format!("{id}Odds")
}

fn percent_id(id: &str) -> String {
    format!("{id}OddsOdds")
}

fn link(text: &str, href: &str) -> ElementSpec {
    ElementSpec::new("a").attr("href", href).text(text)
}

fn radio(group: &str, id: &str) -> ElementSpec {
    ElementSpec::new("input")
        .attr("type", "radio")
        .attr("name", group)
        .id(id)
}

fn mini_entry(mini: &MiniSpec) -> ElementSpec {
    let id = mini.id.as_str();
    let group = format!("{id}RulesVsOdds");
    let percent = ElementSpec::new("input")
        .attr("type", "number")
        .id(&percent_id(id))
        .attr("value", DEFAULT_ODDS)
        .attr("size", "3")
        .attr("min", "0")
        .attr("max", "100");
    let mut entry = ElementSpec::new("li")
        .child(checked_checkbox(id))
        .child(ElementSpec::text_node(" "))
        .child(link(&mini.name, &mini.href))
        .child(radio(&group, &rules_id(id)).attr("checked", "checked"))
        .child(ElementSpec::text_node(" "))
        .child(link("usage rule", &mini.usage_href))
        .child(radio(&group, &odds_id(id)))
        .child(ElementSpec::text_node(" "))
        .child(percent)
        .child(ElementSpec::text_node("%"));
    if let Some(extra) = &mini.extra {
        entry = entry
            .child(ElementSpec::text_node(" ⊚ "))
            .child(link(&extra.name, &extra.href));
    }
    entry
}

/// Add a mini expansion's controls and record the boards it affects.
///
/// # Errors
///
/// Returns [`crate::SetupError::MissingSection`] when the expansions list
/// has not been built.
pub fn add_mini(mini: &MiniSpec, page: &mut dyn Page, mut state: ConfigState) -> SetupResult<ConfigState> {
    let id = mini.id.as_str();
    state.mini.set(id, mini.boards.clone());
    if !page.contains(id) {
        page.insert(mini_entry(mini), Placement::append(EXPANSION_LIST))?;
    }
    for name in [id.to_string(), rules_id(id), odds_id(id), percent_id(id)] {
        let handle = locate(page, &name)?;
        state.fields.insert(&name, handle);
    }
    Ok(state)
}

fn field_checked(state: &ConfigState, name: &str) -> bool {
    state.fields.get(name).is_some_and(|field| field.is_checked())
}

/// Whether the mini expansion follows its usage rule or the odds setting.
#[must_use]
pub fn rule_type(state: &ConfigState, id: &str) -> RuleType {
    if field_checked(state, &rules_id(id)) {
        RuleType::Rules
    } else {
        RuleType::Odds
    }
}

/// Rule type of every mini expansion whose checkbox is checked.
#[must_use]
pub fn minis(state: &ConfigState) -> Vec<(String, RuleType)> {
    state
        .mini
        .keys()
        .filter(|id| field_checked(state, id))
        .map(|id| (id.to_string(), rule_type(state, id)))
        .collect()
}

/// Roll the odds for a mini expansion; rules mode always passes.
///
/// A 0% (or unreadable) setting fails without drawing.
pub fn check_mini_odds(state: &ConfigState, id: &str, rng: &mut dyn Randomizer) -> bool {
    if rule_type(state, id) == RuleType::Rules {
        return true;
    }
    let setting = state
        .fields
        .get(&percent_id(id))
        .map(|field| field.value())
        .unwrap_or_default();
    let percent = match setting.trim().parse::<f64>() {
        Ok(percent) if percent.is_finite() => percent,
        _ => {
            log::warn!("unreadable odds '{setting}' for {id}, treating as 0%");
            return false;
        }
    };
    if percent == 0.0 {
        return false;
    }
    rng.next_unit() * 100.0 < percent
}

/// Whether a mini expansion applies this pass: its checkbox is checked and
/// its rule (or the odds) allows it.
pub fn mini_applies(state: &ConfigState, id: &str, rng: &mut dyn Randomizer) -> bool {
    field_checked(state, id) && check_mini_odds(state, id, rng)
}
