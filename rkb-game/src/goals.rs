//! Goal cards: three drawn per setup, shown in box order.

use crate::boards::selected_types;
use crate::cards::{self, SharedRandom};
use crate::catalog::catalog;
use crate::error::{SetupError, SetupResult};
use crate::page::{ElementSpec, Page, Placement, locate, output_field, require_page};
use crate::part::Part;
use crate::state::{CardPick, ConfigState, FieldView, Fields, Selection, ViewModel};

/// Goal cards scored in one game.
pub const GOAL_COUNT: usize = 3;

const GOAL_IDS: [&str; GOAL_COUNT] = ["c0", "c1", "c2"];

#[must_use]
pub fn goal_field(index: usize) -> String {
    format!("goal{index}")
}

#[derive(Clone)]
pub struct Goals {
    rng: SharedRandom,
}

impl Goals {
    #[must_use]
    pub fn new(rng: SharedRandom) -> Self {
        Self { rng }
    }
}

fn add_goals_section(page: &mut dyn Page) -> SetupResult<()> {
    if page.contains(".goals") {
        return Ok(());
    }
    let section = GOAL_IDS.iter().fold(
        ElementSpec::new("div")
            .class("goals")
            .child(ElementSpec::new("h3").text("GOALS")),
        |section, id| section.child(output_field(id)),
    );
    page.insert(section, Placement::after(".boards"))
}

/// Goal types drawn from: always the base deck, plus every checked box.
fn goal_types(state: &ConfigState, page: &dyn Page) -> Vec<String> {
    let mut types = vec!["base".to_string()];
    types.extend(
        selected_types(state, page)
            .into_iter()
            .filter(|kind| kind != "base"),
    );
    types
}

/// Build the goals section after the map and register the base deck.
///
/// # Errors
///
/// Returns [`SetupError::MissingSection`] when the map section is absent.
pub fn prepare(page: &mut dyn Page, mut state: ConfigState) -> SetupResult<ConfigState> {
    add_goals_section(page)?;
    for (index, id) in GOAL_IDS.iter().enumerate() {
        state.fields.insert(&goal_field(index), locate(page, id)?);
    }
    state
        .contents
        .goals
        .set("base", catalog().base.goals.clone());
    Ok(state)
}

impl Part for Goals {
    fn id(&self) -> &'static str {
        "goals"
    }

    fn init(&self, page: Option<&mut dyn Page>, state: ConfigState) -> SetupResult<ConfigState> {
        prepare(require_page(page)?, state)
    }

    fn update(
        &self,
        state: &ConfigState,
        mut result: Selection,
        page: Option<&dyn Page>,
    ) -> SetupResult<Selection> {
        let page = page.ok_or(SetupError::MissingContext)?;
        let types = goal_types(state, page);
        let goals = &state.contents.goals;
        let pool: Vec<CardPick> = goals
            .iter()
            .filter(|(kind, _)| types.iter().any(|t| t == kind))
            .flat_map(|(kind, names)| names.iter().map(move |name| CardPick::new(name, kind)))
            .collect();

        let mut drawn = {
            let mut rng = self.rng.borrow_mut();
            cards::draw(cards::shuffle(pool, &mut *rng), GOAL_COUNT)
        };
        drawn.sort_by_key(|goal| goals.position(&goal.kind).unwrap_or(usize::MAX));
        log::debug!(
            "goals from {types:?}: {:?}",
            drawn.iter().map(|g| g.name.as_str()).collect::<Vec<_>>()
        );
        result.goals = drawn;
        Ok(result)
    }

    fn render(&self, result: &Selection, mut view: ViewModel) -> ViewModel {
        view.goals = result
            .goals
            .iter()
            .map(|goal| FieldView::new(&goal.name, &goal.kind))
            .collect();
        view
    }

    fn view(&self, view: &ViewModel, fields: &Fields) -> SetupResult<()> {
        for index in 0..GOAL_COUNT {
            let field = fields.require(&goal_field(index))?;
            match view.goals.get(index) {
                Some(goal) => {
                    field.set_value(&goal.value);
                    field.set_class(&goal.class_name);
                }
                None => {
                    field.set_value("");
                    field.set_class("");
                }
            }
        }
        Ok(())
    }
}
