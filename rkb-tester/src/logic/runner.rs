use anyhow::{Context, Result};
use colored::Colorize;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rkb_game::players::player_count;
use rkb_game::{
    BOARD_COUNT, ExpansionRegistry, GOAL_COUNT, MemoryPage, Page, SeededRandom, SetupEngine,
    SetupOutcome, selected_types, shared,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Form settings applied on top of the freshly built controls.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub expansions: Vec<String>,
    /// Checkbox ids to uncheck.
    pub disable: Vec<String>,
    /// Mini expansion ids switched from rules to odds.
    pub odds: Vec<String>,
    pub percent: Option<u32>,
    pub players: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResult {
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    /// Last setup drawn for this seed.
    pub last: Option<SetupOutcome>,
}

/// Outcome of one iteration together with the page it was drawn on.
#[derive(Debug)]
pub struct Iteration {
    pub outcome: SetupOutcome,
    pub page: MemoryPage,
    pub problems: Vec<String>,
}

pub struct SetupRunner {
    config: RunConfig,
    registry: ExpansionRegistry,
    verbose: bool,
    last_page: Option<MemoryPage>,
}

impl SetupRunner {
    /// Runner for `config`, rejecting unknown expansion names up front.
    ///
    /// # Errors
    ///
    /// Fails when an expansion name is not registered.
    pub fn new(config: RunConfig, verbose: bool) -> Result<Self> {
        let registry = ExpansionRegistry::with_builtin();
        if let Some(unknown) = config.expansions.iter().find(|id| !registry.contains(id)) {
            anyhow::bail!("unknown expansion '{unknown}'");
        }
        Ok(Self {
            config,
            registry,
            verbose,
            last_page: None,
        })
    }

    /// Page of the most recent iteration.
    #[must_use]
    pub const fn last_page(&self) -> Option<&MemoryPage> {
        self.last_page.as_ref()
    }

    pub fn run_seeds(&mut self, seeds: &[u64], iterations: usize) -> Vec<SeedResult> {
        seeds
            .iter()
            .map(|&seed| self.run_seed(seed, iterations))
            .collect()
    }

    fn run_seed(&mut self, seed: u64, iterations: usize) -> SeedResult {
        if self.verbose {
            println!("🎲 Seed {} ({iterations} iterations)", seed.to_string().bright_white());
        }
        let mut stream = ChaCha8Rng::seed_from_u64(seed);
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut durations = Vec::new();
        let mut last = None;

        for i in 0..iterations {
            let iteration_seed = stream.next_u64();
            let start = Instant::now();
            match self.run_once(iteration_seed) {
                Ok(iteration) => {
                    durations.push(start.elapsed());
                    if iteration.problems.is_empty() {
                        successes += 1;
                        if self.verbose {
                            println!("  ✅ Iteration {}/{iterations} passed", i + 1);
                        }
                    } else {
                        let joined = iteration.problems.join("; ");
                        if self.verbose {
                            println!("  ❌ Iteration {}/{iterations}: {}", i + 1, joined.red());
                        }
                        failures.push(format!(
                            "Iteration {} (seed {iteration_seed}): {joined}",
                            i + 1
                        ));
                    }
                    last = Some(iteration.outcome);
                    self.last_page = Some(iteration.page);
                }
                Err(err) => {
                    failures.push(format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1));
                }
            }
        }

        let average_duration = if durations.is_empty() {
            Duration::ZERO
        } else {
            durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
        };
        SeedResult {
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            last,
        }
    }

    /// One full cycle on a fresh in-memory page.
    ///
    /// # Errors
    ///
    /// Fails when the engine cannot be built, a requested control is
    /// missing, or a part raises an error.
    pub fn run_once(&self, seed: u64) -> Result<Iteration> {
        let mut page = MemoryPage::new();
        let mut engine = SetupEngine::with_expansions(
            shared(SeededRandom::from_seed(seed)),
            &self.registry,
            self.config.expansions.as_slice(),
        )?;
        engine.initialize(&mut page).context("building controls")?;
        self.apply_settings(&page)?;
        let outcome = engine.randomize(&page).context("drawing setup")?;
        let problems = check_outcome(&engine, &page, &outcome);
        log::debug!("seed {seed}: {} problems", problems.len());
        Ok(Iteration {
            outcome,
            page,
            problems,
        })
    }

    fn apply_settings(&self, page: &MemoryPage) -> Result<()> {
        for id in &self.config.disable {
            page.field(id)
                .with_context(|| format!("no checkbox '{id}' to disable"))?
                .set_checked(false);
        }
        for id in &self.config.odds {
            page.select_radio(&format!("{id}Odds"))
                .with_context(|| format!("'{id}' has no odds setting"))?;
            if let Some(percent) = self.config.percent {
                page.field(&format!("{id}OddsOdds"))
                    .with_context(|| format!("'{id}' has no percentage"))?
                    .set_value(&percent.to_string());
            }
        }
        if let Some(players) = self.config.players {
            page.field("p")
                .context("no player count input")?
                .set_value(&players.to_string());
        }
        Ok(())
    }
}

/// Everything that should hold for any drawn setup.
#[must_use]
pub fn check_outcome(engine: &SetupEngine, page: &dyn Page, outcome: &SetupOutcome) -> Vec<String> {
    let state = engine.state();
    let selection = &outcome.selection;
    let mut problems = Vec::new();

    if selection.boards.len() != BOARD_COUNT {
        problems.push(format!("expected {BOARD_COUNT} boards, got {}", selection.boards.len()));
    }
    let active = selected_types(state, page);
    for board in &selection.boards {
        if !active.contains(&board.kind) || !state.contents.boards.holds(&board.kind, &board.name) {
            problems.push(format!("board {} is not from an active box", board.name));
        }
    }

    if selection.goals.len() != GOAL_COUNT {
        problems.push(format!("expected {GOAL_COUNT} goals, got {}", selection.goals.len()));
    }
    let order: Vec<_> = selection
        .goals
        .iter()
        .map(|goal| state.contents.goals.position(&goal.kind))
        .collect();
    if order.iter().any(Option::is_none) || !order.windows(2).all(|w| w[0] <= w[1]) {
        problems.push("goals are out of box order".to_string());
    }

    if state.contents.tasks.contains_key("crossroads") {
        let expected = selection
            .boards
            .iter()
            .filter(|board| state.contents.boards.holds("crossroads", &board.name))
            .count();
        let drawn = selection.tasks.iter().filter(|task| !task.is_empty()).count();
        if drawn != expected {
            problems.push(format!("{drawn} tasks for {expected} crossroads boards"));
        }
    }

    let count = player_count(&state.fields);
    match selection.starting_player {
        Some(player) if (1..=count).contains(&player) => {}
        other => problems.push(format!("starting player {other:?} outside 1..={count}")),
    }

    for (index, board) in outcome.view.boards.iter().enumerate() {
        let written = page
            .field(&format!("b{index}"))
            .map(|field| field.value())
            .unwrap_or_default();
        if written != board.label() {
            problems.push(format!(
                "board slot {index} shows '{written}', expected '{}'",
                board.label()
            ));
        }
    }
    for (index, goal) in outcome.view.goals.iter().enumerate() {
        let written = page
            .field(&format!("c{index}"))
            .map(|field| field.value())
            .unwrap_or_default();
        if written != goal.value {
            problems.push(format!("goal slot {index} shows '{written}'"));
        }
    }

    problems
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}
