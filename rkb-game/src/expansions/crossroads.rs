//! Crossroads: each of its boards on the map brings a task card.

use crate::boards::{self, BOARD_COUNT};
use crate::cards::{self, SharedRandom};
use crate::catalog::expansion_info;
use crate::error::SetupResult;
use crate::expansions::activation::{add_expansion_entry, ensure_sidebar};
use crate::goals;
use crate::page::{ElementSpec, Page, Placement, locate, output_field, require_page};
use crate::part::Part;
use crate::state::{CardPick, ConfigState, FieldView, Fields, Selection, ViewModel};

pub const ID: &str = "crossroads";

const TASK_IDS: [&str; BOARD_COUNT] = ["t0", "t1", "t2", "t3"];

/// Shown in a task slot without a card so the row keeps its height.
const EMPTY_TASK: &str = "\u{a0}";

#[must_use]
pub fn task_field(index: usize) -> String {
    format!("task{index}")
}

#[derive(Clone)]
pub struct Crossroads {
    rng: SharedRandom,
}

impl Crossroads {
    #[must_use]
    pub fn new(rng: SharedRandom) -> Self {
        Self { rng }
    }
}

fn add_tasks_section(page: &mut dyn Page) -> SetupResult<()> {
    if page.contains(".tasks") {
        return Ok(());
    }
    let section = TASK_IDS.iter().fold(
        ElementSpec::new("div")
            .class("tasks")
            .child(ElementSpec::new("h3").text("TASKS")),
        |section, id| section.child(output_field(id)),
    );
    page.insert(section, Placement::after(".goals"))
}

impl Part for Crossroads {
    fn id(&self) -> &'static str {
        ID
    }

    fn init(&self, page: Option<&mut dyn Page>, mut state: ConfigState) -> SetupResult<ConfigState> {
        let page = require_page(page)?;
        if state.contents.boards.is_empty() || !page.contains(".boards") {
            state = boards::prepare(page, state)?;
        }
        if state.contents.goals.is_empty() || !page.contains(".goals") {
            state = goals::prepare(page, state)?;
        }
        let info = expansion_info(ID);
        state.add_name(ID);
        boards::add_boards(ID, info.boards.clone(), &mut state);
        state.contents.goals.set(ID, Vec::new());
        state.contents.tasks.set(ID, info.tasks.clone());

        add_tasks_section(page)?;
        for (index, id) in TASK_IDS.iter().enumerate() {
            state.fields.insert(&task_field(index), locate(page, id)?);
        }
        let mut state = ensure_sidebar(page, state)?;
        let checkbox = add_expansion_entry(page, &info)?;
        state.fields.insert(ID, checkbox);
        Ok(state)
    }

    fn update(
        &self,
        state: &ConfigState,
        mut result: Selection,
        _page: Option<&dyn Page>,
    ) -> SetupResult<Selection> {
        let count = result
            .boards
            .iter()
            .filter(|board| state.contents.boards.holds(ID, &board.name))
            .count();
        let deck = state.contents.tasks.get(ID).unwrap_or_default().to_vec();
        let drawn = {
            let mut rng = self.rng.borrow_mut();
            cards::draw(cards::shuffle(deck, &mut *rng), count)
        };
        log::debug!("{count} crossroads boards drawn, tasks {drawn:?}");
        result.tasks = (0..result.boards.len())
            .map(|slot| {
                drawn
                    .get(slot)
                    .map_or_else(CardPick::default, |task| CardPick::new(task, ID))
            })
            .collect();
        Ok(result)
    }

    fn render(&self, result: &Selection, mut view: ViewModel) -> ViewModel {
        if result.tasks.is_empty() {
            return view;
        }
        view.tasks = result
            .tasks
            .iter()
            .map(|task| {
                if task.is_empty() {
                    FieldView::new(EMPTY_TASK, "")
                } else {
                    FieldView::new(&task.name, &task.kind)
                }
            })
            .collect();
        view
    }

    fn view(&self, view: &ViewModel, fields: &Fields) -> SetupResult<()> {
        for index in 0..BOARD_COUNT {
            let field = fields.require(&task_field(index))?;
            match view.tasks.get(index) {
                Some(task) => {
                    field.set_value(&task.value);
                    field.set_class(&task.class_name);
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
