use phazed_bot::{HeuristicPolicy, Policy, rank_hand};
use phazed_core::game::history::{Turn, TurnHistory};
use phazed_core::game::state::DecisionState;
use phazed_core::model::card::{Card, parse_cards};
use phazed_core::model::deck::Deck;
use phazed_core::model::hand::Hand;
use phazed_core::model::phase::PhaseType;
use phazed_core::model::play::{Play, PlayType, TableLocation};
use phazed_core::model::table::{Table, TableEntry};
use phazed_core::rules::Ruleset;

fn history_after(play: Option<Play>) -> TurnHistory {
    match play {
        Some(play) => TurnHistory::from_turns(vec![Turn {
            player: 0,
            plays: vec![play],
        }]),
        None => TurnHistory::new(),
    }
}

fn dealt(seed: u64, completed: usize, previous: Option<Play>) -> DecisionState {
    let mut deck = Deck::shuffled_with_seed(seed);
    DecisionState {
        player: 0,
        table: Table::new(4),
        history: history_after(previous),
        phase_status: vec![completed, 0, 0, 0],
        hand: Hand::with_cards(deck.deal(10)),
        discard: deck.draw(),
    }
}

fn laid(phase: PhaseType, groups: &[&str]) -> TableEntry {
    TableEntry {
        phase: Some(phase),
        groups: groups.iter().map(|raw| parse_cards(raw).unwrap()).collect(),
    }
}

fn card(raw: &str) -> Card {
    raw.parse().unwrap()
}

#[test]
fn start_of_hand_only_decides_on_the_discard() {
    let mut policy = HeuristicPolicy::standard();
    for seed in 0..40 {
        let state = dealt(seed, (seed % 7) as usize, None);
        let play = policy.choose(&state).unwrap().play;
        assert!(
            matches!(play.play_type(), PlayType::Draw | PlayType::TakeDiscard),
            "seed {seed} chose {play}"
        );
    }
}

#[test]
fn fallback_discards_the_worst_ranked_card() {
    let rules = Ruleset::standard();
    let policy = HeuristicPolicy::standard();
    for seed in 100..130 {
        let completed = (seed % 7) as usize;
        // After a table play, with no phase down, only a discard is left.
        let previous = Play::ExtendTable {
            card: card("2C"),
            location: TableLocation::new(1, 0, 0),
        };
        let state = dealt(seed, completed, Some(previous));
        let decision = policy.decide(&state).unwrap();
        let phase = PhaseType::after_completed(completed).unwrap();
        let worst = rank_hand(&rules, &state.hand.held(), phase, false, &state.table, 0)
            .worst()
            .unwrap();
        assert_eq!(decision.play, Play::Discard { card: worst.card }, "seed {seed}");
    }
}

#[test]
fn complete_run_is_laid_with_naturals() {
    let policy = HeuristicPolicy::standard();
    let state = DecisionState {
        player: 0,
        table: Table::new(2),
        history: history_after(Some(Play::Draw)),
        phase_status: vec![4, 0],
        hand: Hand::with_cards(parse_cards("3C 4D 5H 6S 7C 8D 9H 0S 5D").unwrap()),
        discard: None,
    };
    let decision = policy.decide(&state).unwrap();
    assert_eq!(
        decision.play,
        Play::LayPhase {
            phase: PhaseType::Five,
            groups: vec![parse_cards("3C 4D 5H 6S 7C 8D 9H 0S").unwrap()],
        }
    );
}

#[test]
fn laid_down_player_extends_the_first_open_group() {
    let policy = HeuristicPolicy::standard();
    let table = Table::from_entries(vec![
        laid(PhaseType::One, &["4C 4D 4H", "6C 6D 6H"]),
        TableEntry::default(),
        laid(PhaseType::Two, &["2S 5S 7S 9S JS QS KS"]),
        laid(PhaseType::One, &["8C 8D 8H", "JC JD JH"]),
    ]);
    let state = DecisionState {
        player: 0,
        table,
        history: history_after(Some(Play::Draw)),
        phase_status: vec![0, 0, 1, 0],
        hand: Hand::with_cards(parse_cards("KD 3S 9H").unwrap()),
        discard: None,
    };
    let decision = policy.decide(&state).unwrap();
    assert_eq!(
        decision.play,
        Play::ExtendTable {
            card: card("3S"),
            location: TableLocation::new(2, 0, 7),
        }
    );

    let mut table = state.table.clone();
    table.apply(0, &decision.play).unwrap();
    assert_eq!(table.entry(2).unwrap().groups[0].len(), 8);
}

#[test]
fn deciding_leaves_the_state_untouched() {
    let policy = HeuristicPolicy::standard();
    for seed in 200..210 {
        let state = dealt(seed, 0, None);
        let before = state.clone();
        policy.decide(&state).unwrap();
        assert_eq!(state, before);
    }
}

#[test]
fn decides_from_a_json_snapshot() {
    let json = r#"{
        "player": 1,
        "table": [{"phase": null}, {"phase": null}],
        "history": [{"player": 0, "plays": [{"play": "discard", "card": "7H"}]}],
        "phase_status": [0, 0],
        "hand": ["7C", "7D", "2S", "9H", "KD"],
        "discard": "7H"
    }"#;
    let state = DecisionState::from_json(json).unwrap();
    let decision = phazed_bot::decide(&state).unwrap();
    assert_eq!(decision.play, Play::TakeDiscard { card: card("7H") });
}
