//! Starting player.

use crate::cards::SharedRandom;
use crate::error::SetupResult;
use crate::expansions::activation;
use crate::page::{ElementSpec, Page, Placement, locate, require_page};
use crate::part::Part;
use crate::state::{ConfigState, Fields, Selection, ViewModel};

pub const MIN_PLAYERS: u32 = 1;
pub const MAX_PLAYERS: u32 = 5;

const PLAYERS_STYLE: &str = ".players {padding: 1em; margin: 0 3em; clear: left;}";

#[derive(Clone)]
pub struct Players {
    rng: SharedRandom,
}

impl Players {
    #[must_use]
    pub fn new(rng: SharedRandom) -> Self {
        Self { rng }
    }
}

/// Player count typed into the form, clamped to the supported range.
#[must_use]
pub fn player_count(fields: &Fields) -> u32 {
    let raw = fields
        .get("playerCount")
        .map(|field| field.value())
        .unwrap_or_default();
    match raw.trim().parse::<i64>() {
        Ok(count) => {
            let clamped = count.clamp(i64::from(MIN_PLAYERS), i64::from(MAX_PLAYERS));
            u32::try_from(clamped).unwrap_or(MAX_PLAYERS)
        }
        Err(_) => {
            log::warn!("unreadable player count '{raw}', assuming {MAX_PLAYERS}");
            MAX_PLAYERS
        }
    }
}

fn add_players_section(page: &mut dyn Page) -> SetupResult<()> {
    if page.contains(".players") {
        return Ok(());
    }
    let input = ElementSpec::new("input")
        .attr("type", "number")
        .id("p")
        .attr("value", &MAX_PLAYERS.to_string())
        .attr("size", "2")
        .attr("min", &MIN_PLAYERS.to_string())
        .attr("max", &MAX_PLAYERS.to_string());
    let paragraph = ElementSpec::new("p")
        .class("players")
        .text("PLAYERS")
        .child(ElementSpec::text_node(" "))
        .child(input)
        .child(ElementSpec::text_node(" "))
        .child(ElementSpec::new("label").id("pc"));
    page.insert(ElementSpec::new("style").text(PLAYERS_STYLE), Placement::append(".sidebar"))?;
    page.insert(paragraph, Placement::append(".sidebar"))
}

impl Part for Players {
    fn id(&self) -> &'static str {
        "players"
    }

    fn init(&self, page: Option<&mut dyn Page>, state: ConfigState) -> SetupResult<ConfigState> {
        let page = require_page(page)?;
        let mut state = activation::ensure_sidebar(page, state)?;
        add_players_section(page)?;
        state.fields.insert("playerCount", locate(page, "p")?);
        state.fields.insert("playerChosen", locate(page, "pc")?);
        Ok(state)
    }

    fn update(
        &self,
        state: &ConfigState,
        mut result: Selection,
        _page: Option<&dyn Page>,
    ) -> SetupResult<Selection> {
        let count = player_count(&state.fields);
        let roll = self.rng.borrow_mut().next_unit();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let starting = (roll * f64::from(count)).floor() as u32 + 1;
        log::debug!("player {starting} of {count} starts");
        result.starting_player = Some(starting.min(count));
        Ok(result)
    }

    fn render(&self, result: &Selection, mut view: ViewModel) -> ViewModel {
        view.starting_player = result
            .starting_player
            .map(|player| format!("Player {player} starts"));
        view
    }

    fn view(&self, view: &ViewModel, fields: &Fields) -> SetupResult<()> {
        if let Some(text) = &view.starting_player {
            fields.require("playerChosen")?.set_text(text);
        }
        Ok(())
    }
}
