//! Turn scheduler and round state machine.
//!
//! Actors act round-robin, seeker first. Pursuers run to completion inside
//! [`Game::run_until_blocked`]; the loop stops at the seeker's turn (or at
//! the round-over confirmation) and resumes when [`Game::offer`] resolves the
//! pending wait with an intent.

use bevy::prelude::Resource;
use micromegas_tracing::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::actor::{Actor, ActorKind, spawn_actor};
use crate::ai::{self, PursuitOutcome};
use crate::components::Cell;
use crate::config::GameConfig;
use crate::grid::{DestroyOutcome, SearchOutcome, Tile, TileGrid};
use crate::intent::{InputSlot, Intent, WaitKind};
use crate::mapgen::{Digger, MapGenerator};
use crate::render::{GlyphFrame, MessageLog, RenderSurface, status_line};
use crate::session::{RoundOverReason, Session};

/// Terminal flags of the current round. The round is over iff any is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub prize_found: bool,
    pub prize_destroyed: bool,
    pub seeker_caught: bool,
}

impl Outcome {
    pub fn is_over(&self) -> bool {
        self.reason().is_some()
    }

    /// Losses take precedence over a found prize.
    pub fn reason(&self) -> Option<RoundOverReason> {
        if self.seeker_caught {
            Some(RoundOverReason::SeekerCaught)
        } else if self.prize_destroyed {
            Some(RoundOverReason::PrizeDestroyed)
        } else if self.prize_found {
            Some(RoundOverReason::PrizeFound)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Playing,
    RoundOver(RoundOverReason),
}

#[derive(Resource)]
pub struct Game {
    config: GameConfig,
    generator: Box<dyn MapGenerator>,
    rng: StdRng,
    grid: TileGrid,
    /// Seeker at index 0, then pursuers in spawn order.
    actors: Vec<Actor>,
    current: usize,
    outcome: Outcome,
    status: RoundStatus,
    session: Session,
    round: u32,
    input: InputSlot,
    log: MessageLog,
    frame: GlyphFrame,
}

impl Game {
    /// A game on a rooms-and-corridors map, first round already set up.
    pub fn new(config: GameConfig) -> Self {
        Game::with_generator(config, Box::new(Digger::default()))
    }

    pub fn with_generator(config: GameConfig, generator: Box<dyn MapGenerator>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut game = Game::empty(config, generator, rng);
        game.start_round();
        game
    }

    /// A round assembled from explicit parts, seeker first in `actors`.
    /// Later rounds are generated with `generator`.
    pub fn from_parts(
        config: GameConfig,
        generator: Box<dyn MapGenerator>,
        grid: TileGrid,
        actors: Vec<Actor>,
        rng: StdRng,
    ) -> Self {
        let mut game = Game::empty(config, generator, rng);
        game.grid = grid;
        game.actors = actors;
        game.round = 1;
        game.render();
        game.run_until_blocked();
        game
    }

    fn empty(config: GameConfig, generator: Box<dyn MapGenerator>, rng: StdRng) -> Self {
        Game {
            log: MessageLog::new(config.message_log_lines),
            frame: GlyphFrame::new(config.display_width(), config.display_height()),
            config,
            generator,
            rng,
            grid: TileGrid::default(),
            actors: Vec::new(),
            current: 0,
            outcome: Outcome::default(),
            status: RoundStatus::Playing,
            session: Session::default(),
            round: 0,
            input: InputSlot::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn seeker(&self) -> Option<&Actor> {
        self.actors.first()
    }

    pub fn pursuers(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().skip(1)
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn pending_wait(&self) -> Option<WaitKind> {
        self.input.pending()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn frame(&self) -> &GlyphFrame {
        &self.frame
    }

    // -----------------------------------------------------------------------
    // Round lifecycle
    // -----------------------------------------------------------------------

    /// Reinitialise: apply the previous round's outcome to the session,
    /// generate a new map, respawn actors and wait for the seeker.
    fn start_round(&mut self) {
        span_scope!("start_round");
        if let RoundStatus::RoundOver(reason) = self.status {
            self.session.conclude_round(reason);
        }
        self.input.retire();
        self.round += 1;
        self.outcome = Outcome::default();
        self.status = RoundStatus::Playing;
        self.current = 0;
        self.log.clear();

        let (width, height) = (self.config.map_width, self.config.map_height);
        self.grid
            .generate(self.generator.as_mut(), width, height, &mut self.rng);
        self.grid
            .place_boxes(self.config.max_boxes as usize, &mut self.rng);

        let lineup = self.session.pursuer_lineup(&mut self.rng);
        let cells = self
            .grid
            .random_cells_of_type(Tile::Floor, 1 + lineup.len(), &mut self.rng);
        let seeker_cell = match cells.first() {
            Some(cell) => *cell,
            None => {
                warn!("round {}: no free floor for the seeker", self.round);
                Cell::new(0, 0)
            }
        };
        self.actors = std::iter::once(spawn_actor(ActorKind::Seeker, seeker_cell))
            .chain(
                lineup
                    .iter()
                    .zip(cells.iter().skip(1))
                    .map(|(kind, cell)| spawn_actor(*kind, *cell)),
            )
            .collect();

        info!(
            "round {} started: map={}x{} walkable={} pursuers={:?}",
            self.round,
            width,
            height,
            self.grid.walkable_count(),
            lineup
        );
        self.render();
        self.run_until_blocked();
    }

    /// Execute actors until one needs input. Pursuers never block.
    fn run_until_blocked(&mut self) {
        loop {
            if let RoundStatus::RoundOver(_) = self.status {
                if self.input.pending() != Some(WaitKind::RoundOverConfirm) {
                    self.input
                        .register(WaitKind::RoundOverConfirm, Intent::is_continue);
                }
                return;
            }
            let Some(actor) = self.actors.get(self.current) else {
                return;
            };
            if actor.kind == ActorKind::Seeker {
                if self.input.pending() != Some(WaitKind::SeekerTurn) {
                    self.input
                        .register(WaitKind::SeekerTurn, Intent::is_seeker_action);
                }
                return;
            }
            self.pursuer_act(self.current);
            self.complete_action(false);
        }
    }

    /// Feed an intent to the pending wait. Returns whether it was accepted.
    pub fn offer(&mut self, intent: Intent) -> bool {
        let Some(resolution) = self.input.offer(intent) else {
            return false;
        };
        match resolution.kind {
            WaitKind::SeekerTurn => {
                if !self.seeker_act(resolution.intent) {
                    self.input
                        .register(WaitKind::SeekerTurn, Intent::is_seeker_action);
                    return false;
                }
                self.complete_action(true);
                self.run_until_blocked();
            }
            WaitKind::RoundOverConfirm => self.start_round(),
        }
        true
    }

    /// Bookkeeping after any actor's action, then hand the turn on.
    fn complete_action(&mut self, by_seeker: bool) {
        if by_seeker {
            self.session.turns += 1;
            imetric!("turns_elapsed", "count", self.session.turns);
        }
        self.render();

        if let (RoundStatus::Playing, Some(reason)) = (self.status, self.outcome.reason()) {
            self.status = RoundStatus::RoundOver(reason);
            self.narrate(reason.prompt());
            info!(
                "round {} over: {:?} turns={} prizes={}",
                self.round, reason, self.session.turns, self.session.prizes_found
            );
            self.render();
        }

        if !self.actors.is_empty() {
            self.current = (self.current + 1) % self.actors.len();
        }
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Returns false when the intent does not conclude the turn.
    fn seeker_act(&mut self, intent: Intent) -> bool {
        let Some(seeker) = self.actors.first_mut() else {
            return false;
        };
        match intent {
            Intent::Move(dir) => {
                let destination = seeker.position.step(dir);
                if !self.grid.is_passable(destination) {
                    debug!("move to {} rejected, not walkable", destination);
                    return false;
                }
                seeker.position = destination;
            }
            Intent::Search => {
                let at = seeker.position;
                let result = self.grid.search(at);
                if matches!(result, SearchOutcome::Empty | SearchOutcome::FoundPrize) {
                    self.session.boxes_searched += 1;
                }
                if result == SearchOutcome::FoundPrize && !self.outcome.prize_found {
                    self.outcome.prize_found = true;
                    self.session.prizes_found += 1;
                    imetric!("prizes_found", "count", self.session.prizes_found as u64);
                }
                self.narrate(result.message());
            }
            Intent::Wait => {}
            Intent::Continue => return false,
        }
        true
    }

    fn pursuer_act(&mut self, index: usize) {
        let Some(seeker) = self.seeker().map(|s| s.position) else {
            return;
        };
        let others: Vec<Cell> = self
            .actors
            .iter()
            .enumerate()
            .filter(|(i, a)| *i != index && a.kind.is_pursuer())
            .map(|(_, a)| a.position)
            .collect();

        let actor = &mut self.actors[index];
        let name = actor.name();
        let result: PursuitOutcome = match actor.kind {
            ActorKind::DirectPursuer => {
                ai::direct::take_turn(&mut actor.position, seeker, &self.grid, &others)
            }
            ActorKind::IndirectPursuer => ai::indirect::take_turn(
                &mut actor.position,
                &mut actor.target,
                seeker,
                &mut self.grid,
                &others,
                &mut self.rng,
            ),
            ActorKind::Seeker => return,
        };

        if result.caught_seeker {
            self.outcome.seeker_caught = true;
            info!("{} caught the seeker at {}", name, seeker);
            self.narrate(&format!("{name} caught you!"));
        }
        if result.destroyed_prize() {
            self.outcome.prize_destroyed = true;
            info!("{} destroyed the prize", name);
            self.narrate(&format!("{name} destroyed the pineapple!"));
        } else if let Some(DestroyOutcome::Destroyed { .. }) = result.destroyed {
            self.narrate(&format!("{name} destroyed a box"));
        }
    }

    fn narrate(&mut self, line: &str) {
        info!("log: {}", line);
        self.log.append(line);
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Full-panel redraw: tiles, pursuers, seeker, status line, log.
    pub fn draw(&self, surface: &mut impl RenderSurface) {
        surface.clear();
        self.grid.draw(surface);
        for pursuer in self.pursuers() {
            surface.draw_glyph(pursuer.position, pursuer.glyph());
        }
        if let Some(seeker) = self.seeker() {
            surface.draw_glyph(seeker.position, seeker.glyph());
        }

        let width = self.config.display_width();
        let status_row = self.config.map_height;
        let status = status_line(
            self.session.turns,
            self.session.prizes_found,
            self.session.boxes_searched_this_round(),
            self.config.max_boxes,
        );
        surface.draw_text(Cell::new(0, status_row), &status, width);
        self.log.draw(surface, Cell::new(0, status_row + 1), width);
    }

    fn render(&mut self) {
        let mut frame = std::mem::replace(&mut self.frame, GlyphFrame::new(0, 0));
        self.draw(&mut frame);
        self.frame = frame;
    }
}
