//! Integration tests for full-hand game flow.
//!
//! These tests verify phase transitions, pot accounting, and turn order
//! across a complete hand launched from a table.

use card_table::{GameError, Player, PhaseName, Table, TableConfig};

fn three_handed_table() -> Table {
    // Seat players one at a time; the heads-up hand that launches on the
    // second seating is finished so the third player joins the next hand.
    let mut table = Table::new(TableConfig {
        name: "flow".to_string(),
        small_blind: 5,
        seat_count: 3,
    })
    .unwrap();
    table.occupy_seat(0, Player::new("alice", 500)).unwrap();
    table.occupy_seat(1, Player::new("bob", 500)).unwrap();
    table.finish_hand().unwrap();
    table.occupy_seat(2, Player::new("carol", 500)).unwrap();
    table
}

#[test]
fn test_full_hand_to_showdown() {
    let mut table = three_handed_table();
    let game = table.current_game_mut().unwrap();

    // Lineup after the dealer at seat 0: bob (SB), carol (BB), alice.
    game.deal().unwrap();
    game.post_blinds().unwrap();
    assert_eq!(game.current_phase().name(), PhaseName::PreFlop);
    assert_eq!(game.pot_size(), 15);
    for player in game.players() {
        assert_eq!(player.hand().len(), 2);
    }

    // Alice calls 10, bob completes to 10, carol checks.
    game.bet(10).unwrap();
    game.bet(5).unwrap();
    game.bet(0).unwrap();
    assert!(game.is_betting_complete());

    assert_eq!(game.advance_phase().unwrap(), PhaseName::Flop);
    assert_eq!(game.current_phase().community().len(), 3);
    assert_eq!(game.pot_size(), 30);

    // Bob leads, carol folds, alice calls.
    game.bet(40).unwrap();
    game.fold().unwrap();
    game.bet(40).unwrap();

    assert_eq!(game.advance_phase().unwrap(), PhaseName::Turn);
    assert_eq!(game.current_phase().community().len(), 4);
    assert_eq!(game.pot_size(), 110);
    assert_eq!(game.active_players(), 2);

    // Check it down.
    game.bet(0).unwrap();
    game.bet(0).unwrap();
    assert_eq!(game.advance_phase().unwrap(), PhaseName::River);
    assert_eq!(game.current_phase().community().len(), 5);

    game.bet(0).unwrap();
    game.bet(0).unwrap();
    assert_eq!(game.advance_phase().unwrap(), PhaseName::Showdown);
    assert_eq!(game.pot_size(), 110);
    assert_eq!(game.history().len(), 4);

    // No betting or further transition at showdown.
    assert_eq!(game.bet(10).unwrap_err(), GameError::HandComplete);
    assert_eq!(game.advance_phase().unwrap_err(), GameError::HandComplete);
}

#[test]
fn test_community_cards_only_on_street_entry() {
    let mut table = three_handed_table();
    let game = table.current_game_mut().unwrap();
    game.deal().unwrap();

    // The pre-flop board must stay empty until the flop is entered.
    assert!(game.current_phase().community().is_empty());
    game.bet(10).unwrap();
    game.bet(10).unwrap();
    game.bet(10).unwrap();
    game.advance_phase().unwrap();
    assert_eq!(game.current_phase().community().len(), 3);
}

#[test]
fn test_folded_players_are_skipped_across_phases() {
    let mut table = three_handed_table();
    let game = table.current_game_mut().unwrap();
    game.deal().unwrap();

    // Bob (index 0) folds immediately.
    game.fold().unwrap();
    game.bet(20).unwrap();
    game.bet(20).unwrap();
    game.advance_phase().unwrap();

    // The flop opens on carol (index 1), the first non-folded player.
    assert_eq!(game.current_phase().current_player_idx(), 1);
    game.bet(0).unwrap();
    // After alice (index 2) acts, the turn wraps back past bob to carol.
    game.bet(0).unwrap();
    assert_eq!(game.current_phase().current_player_idx(), 1);
}

#[test]
fn test_turn_pointer_full_lap_with_no_folds() {
    let mut table = three_handed_table();
    let game = table.current_game_mut().unwrap();
    game.deal().unwrap();

    let start = game.current_phase().current_player_idx();
    game.bet(10).unwrap();
    game.bet(10).unwrap();
    game.bet(10).unwrap();
    assert_eq!(game.current_phase().current_player_idx(), start);
}

#[test]
fn test_all_in_short_stack_settles_into_side_pots() {
    let mut table = Table::new(TableConfig {
        name: "all-in".to_string(),
        small_blind: 5,
        seat_count: 2,
    })
    .unwrap();
    table.occupy_seat(0, Player::new("deep", 500)).unwrap();
    table.occupy_seat(1, Player::new("short", 60)).unwrap();

    let game = table.current_game_mut().unwrap();
    game.deal().unwrap();
    // Lineup: short (BB, index 0), deep (SB/dealer, index 1).
    game.bet(60).unwrap();
    game.bet(150).unwrap();
    game.advance_phase().unwrap();

    let pots = game.side_pots();
    assert_eq!(pots.len(), 2);
    assert_eq!(pots[0].amount, 120);
    assert_eq!(pots[0].eligible, vec![0, 1]);
    assert_eq!(pots[1].amount, 90);
    assert_eq!(pots[1].eligible, vec![1]);
}

#[test]
fn test_finished_hand_persists_stacks_and_allows_next_launch() {
    let mut table = three_handed_table();
    {
        let game = table.current_game_mut().unwrap();
        game.deal().unwrap();
        game.post_blinds().unwrap();
        game.bet(10).unwrap();
        game.bet(5).unwrap();
        game.bet(0).unwrap();
    }
    table.finish_hand().unwrap();

    // Everyone paid 10 into the aborted-at-flop hand.
    for seat in table.seats() {
        assert_eq!(seat.player().unwrap().chips(), 490);
    }
    assert!(!table.game_in_progress());

    // A seating change launches the next hand with the persisted stacks.
    table.vacate_seat(0).unwrap();
    table.occupy_seat(0, Player::new("dave", 500)).unwrap();
    assert!(table.game_in_progress());
}
