//! Seating, role assignment, and hand-launch orchestration.
//!
//! Every seating change runs the hand-launch pipeline: a gated sequence of
//! checks and transforms that either starts a new hand or aborts silently,
//! leaving the table as it was. Gate failures are business outcomes, not
//! errors; only invalid inputs (bad blind, bad seat index) return `Err`.

use log::{info, warn};
use serde_json::json;
use std::rc::Rc;
use uuid::Uuid;

use super::TableError;
use super::config::TableConfig;
use super::seat::{Role, Seat};
use crate::events::{Notifier, TableEvent};
use crate::game::entities::{Blinds, Chips, Player};
use crate::game::phase::HandPositions;
use crate::game::state_machine::Game;
use crate::pipeline::{Pipeline, StepOutcome};

/// A fixed ring of seats with blind amounts and at most one running hand.
#[derive(Debug)]
pub struct Table {
    id: Uuid,
    name: String,
    blinds: Blinds,
    seats: Vec<Seat>,
    game_in_progress: bool,
    current_game: Option<Game>,
    notifier: Rc<Notifier>,
}

/// Scratch state threaded through one hand-launch pipeline run.
struct LaunchContext<'a> {
    table: &'a mut Table,
    lineup: Vec<Player>,
    positions: HandPositions,
}

impl Table {
    pub fn new(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        let notifier = Rc::new(Notifier::new());
        let seats = (0..config.seat_count)
            .map(|position| Seat::new(position, Rc::clone(&notifier)))
            .collect();
        Ok(Self {
            id: Uuid::new_v4(),
            name: config.name,
            blinds: Blinds::from_small(config.small_blind),
            seats,
            game_in_progress: false,
            current_game: None,
            notifier,
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn blinds(&self) -> Blinds {
        self.blinds
    }

    /// Ordered view of the seats by position.
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|seat| seat.is_occupied()).count()
    }

    #[must_use]
    pub fn game_in_progress(&self) -> bool {
        self.game_in_progress
    }

    #[must_use]
    pub fn current_game(&self) -> Option<&Game> {
        self.current_game.as_ref()
    }

    pub fn current_game_mut(&mut self) -> Option<&mut Game> {
        self.current_game.as_mut()
    }

    /// Channel for seat and table notifications.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Update the small blind; the big blind is rederived as twice it.
    pub fn update_blinds(&mut self, small_blind: Chips) -> Result<(), TableError> {
        if small_blind == 0 {
            return Err(TableError::InvalidBlind);
        }
        self.blinds = Blinds::from_small(small_blind);
        Ok(())
    }

    /// Seat a player, then run the hand-launch pipeline.
    pub fn occupy_seat(&mut self, position: usize, player: Player) -> Result<(), TableError> {
        let seat = self
            .seats
            .get_mut(position)
            .ok_or(TableError::InvalidSeatIndex(position))?;
        let player_id = player.id();
        seat.occupy(player)?;
        self.seating_changed(
            "seat.occupied",
            json!({ "position": position, "player_id": player_id }),
        );
        Ok(())
    }

    /// Clear a seat, then run the hand-launch pipeline. Returns the player
    /// that was seated, if any.
    pub fn vacate_seat(&mut self, position: usize) -> Result<Option<Player>, TableError> {
        let seat = self
            .seats
            .get_mut(position)
            .ok_or(TableError::InvalidSeatIndex(position))?;
        let player = seat.vacate();
        if player.is_some() {
            self.seating_changed("seat.vacated", json!({ "position": position }));
        }
        Ok(player)
    }

    /// Recompute dealer and blind roles from scratch for the current
    /// occupancy. With two occupied seats the lower position is both
    /// dealer and small blind; with three or more, the first three
    /// occupied positions take dealer, small blind, and big blind.
    pub fn assign_roles(&mut self) {
        for seat in &mut self.seats {
            seat.clear_roles();
        }
        let occupied: Vec<usize> = self
            .seats
            .iter()
            .filter(|seat| seat.is_occupied())
            .map(Seat::position)
            .collect();
        match occupied[..] {
            [] | [_] => {}
            [dealer, big] => {
                self.seats[dealer].add_role(Role::Dealer);
                self.seats[dealer].add_role(Role::SmallBlind);
                self.seats[big].add_role(Role::BigBlind);
            }
            [dealer, small, big, ..] => {
                self.seats[dealer].add_role(Role::Dealer);
                self.seats[small].add_role(Role::SmallBlind);
                self.seats[big].add_role(Role::BigBlind);
            }
        }
    }

    /// End the current hand: write each hand player's chip stack back to
    /// its seat and discard the game. The next seating change may launch a
    /// new hand. Returns the finished game for settlement or inspection.
    pub fn finish_hand(&mut self) -> Option<Game> {
        let game = self.current_game.take()?;
        self.game_in_progress = false;
        for player in game.players() {
            let seated = self
                .seats
                .iter_mut()
                .find(|seat| seat.player().is_some_and(|p| p.id() == player.id()))
                .and_then(Seat::player_mut);
            if let Some(seated) = seated {
                seated.set_chips(player.chips());
            }
        }
        info!("table {}: hand {} finished", self.id, game.id());
        Some(game)
    }

    /// Run the hand-launch pipeline for a seating change.
    fn seating_changed(&mut self, trigger: &str, data: serde_json::Value) {
        let pipeline = Pipeline::new("hand-launch")
            .step("game-not-in-progress", gate_no_game)
            .step("min-occupancy", gate_occupancy)
            .step("assign-roles", step_assign_roles)
            .step("player-funds", gate_funds)
            .step("build-lineup", step_build_lineup);
        let mut ctx = LaunchContext {
            table: self,
            lineup: Vec::new(),
            positions: HandPositions::default(),
        };
        pipeline.run(trigger, data, &mut ctx, launch_game);
    }
}

fn gate_no_game(ctx: &mut LaunchContext) -> StepOutcome {
    if ctx.table.game_in_progress {
        StepOutcome::Abort("a hand is already in progress".to_string())
    } else {
        StepOutcome::Continue
    }
}

fn gate_occupancy(ctx: &mut LaunchContext) -> StepOutcome {
    let occupied = ctx.table.occupied_count();
    if occupied < 2 {
        StepOutcome::Abort(format!("{occupied} occupied seats, need 2"))
    } else {
        StepOutcome::Continue
    }
}

fn step_assign_roles(ctx: &mut LaunchContext) -> StepOutcome {
    ctx.table.assign_roles();
    StepOutcome::Continue
}

fn gate_funds(ctx: &mut LaunchContext) -> StepOutcome {
    let big_blind = ctx.table.blinds.big;
    for seat in &ctx.table.seats {
        if let Some(player) = seat.player()
            && player.chips() < big_blind
        {
            return StepOutcome::Abort(format!(
                "{} cannot cover the ${big_blind} big blind",
                player.name()
            ));
        }
    }
    StepOutcome::Continue
}

/// Collect occupied seats' players in circular position order starting at
/// the seat after the dealer, recording where the button and blinds land
/// in the new list.
fn step_build_lineup(ctx: &mut LaunchContext) -> StepOutcome {
    let seats = &ctx.table.seats;
    let Some(dealer_pos) = seats
        .iter()
        .find(|seat| seat.roles().contains(&Role::Dealer))
        .map(Seat::position)
    else {
        return StepOutcome::Abort("no dealer assigned".to_string());
    };

    let size = seats.len();
    let mut lineup = Vec::with_capacity(ctx.table.occupied_count());
    let mut positions = HandPositions::default();
    for offset in 1..=size {
        let seat = &seats[(dealer_pos + offset) % size];
        let Some(player) = seat.player() else {
            continue;
        };
        let idx = lineup.len();
        if seat.roles().contains(&Role::Dealer) {
            positions.dealer_idx = idx;
        }
        if seat.roles().contains(&Role::SmallBlind) {
            positions.small_blind_idx = idx;
        }
        if seat.roles().contains(&Role::BigBlind) {
            positions.big_blind_idx = idx;
        }
        lineup.push(player.clone());
    }
    ctx.lineup = lineup;
    ctx.positions = positions;
    StepOutcome::Continue
}

/// Terminal action: construct the hand and announce it.
fn launch_game(ctx: &mut LaunchContext) {
    let lineup = std::mem::take(&mut ctx.lineup);
    let occupancy = lineup.len();
    match Game::new(ctx.table.blinds, lineup, ctx.positions) {
        Ok(game) => {
            let players = game.players().iter().map(Player::id).collect();
            info!(
                "table {}: hand {} started with {occupancy} players",
                ctx.table.id,
                game.id()
            );
            ctx.table.notifier.emit(&TableEvent::NewGame {
                table_id: ctx.table.id,
                occupancy,
                players,
                dealer_position: ctx.positions.dealer_idx,
            });
            ctx.table.current_game = Some(game);
            ctx.table.game_in_progress = true;
        }
        Err(err) => warn!("table {}: hand not started: {err}", ctx.table.id),
    }
}
