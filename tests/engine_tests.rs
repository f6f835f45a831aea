//! End-to-end tests of the turn machine against scripted states.

use std::sync::Arc;

use cubirds::{
    CardMultiset, Catalog, FlockTier, GameState, IllegalMove, Phase, PlayerId, Side,
};

fn standard() -> Arc<Catalog> {
    Arc::new(Catalog::standard())
}

/// Three-species catalog with a small=3/big=5 species for threshold tests.
fn fixture() -> Arc<Catalog> {
    Arc::new(
        Catalog::from_json(
            r#"{
                "ant": {"count": 12, "small": 3, "big": 5},
                "bee": {"count": 10, "small": 2, "big": 4},
                "cat": {"count": 10, "small": 4, "big": 6}
            }"#,
        )
        .unwrap(),
    )
}

fn hand_of(catalog: &Catalog, names: &[&str]) -> CardMultiset {
    CardMultiset::from_birds(
        catalog.len(),
        names.iter().map(|n| catalog.lookup(n).unwrap()),
    )
}

/// The canonical scripted turn: laying cubes on the left of
/// `[parrot, parrot, parrot, parrot, cube]` captures the four parrots,
/// completion draws the lone sparrow, and flocking the parrots leaves a
/// one-card hand.
#[test]
fn scripted_turn_matches_the_rules() {
    let catalog = standard();
    let mut game = GameState::new(Arc::clone(&catalog), 1, 1, 0);

    let parrot = catalog.lookup("parrot").unwrap();
    let cube = catalog.lookup("cube").unwrap();
    let sparrow = catalog.lookup("sparrow").unwrap();

    game.set_deck(CardMultiset::from_birds(catalog.len(), [sparrow]));
    game.set_discard(CardMultiset::empty(catalog.len()));
    game.set_row(0, vec![parrot, parrot, parrot, parrot, cube]);
    game.set_hand(
        PlayerId::new(0),
        hand_of(&catalog, &["cube", "cube", "sandwich"]),
    );
    assert_eq!(game.phase(), Phase::Lay);

    game.lay(cube, 0, Side::Left, true).unwrap();

    assert_eq!(game.phase(), Phase::Flock);
    assert!(game.deck().is_empty());
    assert_eq!(game.board().row(0), &[cube, cube, cube, sparrow]);
    assert_eq!(game.current_hand().count(parrot), 4);

    game.flock(Some(parrot)).unwrap();

    assert_eq!(game.phase(), Phase::Lay);
    assert_eq!(
        game.hand(PlayerId::new(0)),
        &hand_of(&catalog, &["sandwich"])
    );
    assert_eq!(game.collection(PlayerId::new(0)).count(parrot), 1);
    // The three parrots that did not score were discarded.
    assert_eq!(game.discard_pile().count(parrot), 3);
}

#[test]
fn small_flock_scores_one_copy() {
    let catalog = fixture();
    let mut game = GameState::new(Arc::clone(&catalog), 1, 1, 3);
    let ant = catalog.lookup("ant").unwrap();
    let bee = catalog.lookup("bee").unwrap();
    let cat = catalog.lookup("cat").unwrap();

    game.set_hand(PlayerId::new(0), hand_of(&catalog, &["ant", "ant", "ant", "bee"]));
    game.set_row(0, vec![ant, cat]);
    let before = game.collection(PlayerId::new(0)).count(ant);

    // Open lay of the bee without drawing keeps the ants untouched.
    game.lay(bee, 0, Side::Right, false).unwrap();
    game.flock(Some(ant)).unwrap();

    assert_eq!(game.collection(PlayerId::new(0)).count(ant), before + 1);
}

#[test]
fn big_flock_scores_two_copies() {
    let catalog = fixture();
    let mut game = GameState::new(Arc::clone(&catalog), 1, 1, 3);
    let ant = catalog.lookup("ant").unwrap();
    let bee = catalog.lookup("bee").unwrap();
    let cat = catalog.lookup("cat").unwrap();

    game.set_hand(
        PlayerId::new(0),
        hand_of(&catalog, &["ant", "ant", "ant", "ant", "ant", "bee"]),
    );
    game.set_row(0, vec![ant, cat]);
    let before = game.collection(PlayerId::new(0)).count(ant);

    game.lay(bee, 0, Side::Right, false).unwrap();
    game.flock(Some(ant)).unwrap();

    assert_eq!(game.collection(PlayerId::new(0)).count(ant), before + 2);
}

#[test]
fn flock_below_threshold_is_rejected_atomically() {
    let catalog = fixture();
    let mut game = GameState::new(Arc::clone(&catalog), 1, 1, 3);
    let ant = catalog.lookup("ant").unwrap();
    let bee = catalog.lookup("bee").unwrap();
    let cat = catalog.lookup("cat").unwrap();

    game.set_hand(PlayerId::new(0), hand_of(&catalog, &["ant", "ant", "bee"]));
    game.set_row(0, vec![ant, cat]);
    game.lay(bee, 0, Side::Right, false).unwrap();

    let hand_before = game.current_hand().clone();
    let err = game.flock(Some(ant)).unwrap_err();

    assert_eq!(
        err,
        IllegalMove::FlockBelowThreshold {
            bird: ant,
            held: 2,
            needed: 3,
        }
    );
    assert_eq!(game.current_hand(), &hand_before);
    assert_eq!(game.phase(), Phase::Flock);
}

#[test]
fn flock_in_lay_phase_is_rejected() {
    let catalog = standard();
    let mut game = GameState::new(catalog, 2, 4, 42);

    assert_eq!(
        game.flock(None).unwrap_err(),
        IllegalMove::WrongPhase {
            attempted: Phase::Flock,
            current: Phase::Lay,
        }
    );
}

#[test]
fn completing_a_triple_wins_the_game() {
    let catalog = fixture();
    let mut game = GameState::new(Arc::clone(&catalog), 2, 1, 3);
    let ant = catalog.lookup("ant").unwrap();
    let bee = catalog.lookup("bee").unwrap();
    let cat = catalog.lookup("cat").unwrap();

    // One triple banked; scoring a second species' third copy wins.
    let mut collection = CardMultiset::empty(catalog.len());
    collection.add(ant, 3);
    collection.add(bee, 2);
    game.set_collection(PlayerId::new(0), collection);

    game.set_hand(PlayerId::new(0), hand_of(&catalog, &["bee", "bee", "cat"]));
    game.set_row(0, vec![ant, bee]);

    game.lay(cat, 0, Side::Right, false).unwrap();
    game.flock(Some(bee)).unwrap();

    assert!(game.ended());
    assert_eq!(game.winner(), Some(PlayerId::new(0)));
    assert_eq!(game.collection(PlayerId::new(0)).count(bee), 3);

    // Terminal state accepts no further moves.
    assert!(matches!(
        game.lay(ant, 0, Side::Left, true),
        Err(IllegalMove::GameOver { .. })
    ));
}

#[test]
fn near_miss_collection_does_not_win() {
    let catalog = standard();
    let mut game = GameState::new(Arc::clone(&catalog), 1, 1, 9);
    let parrot = catalog.lookup("parrot").unwrap();
    let cube = catalog.lookup("cube").unwrap();
    let sparrow = catalog.lookup("sparrow").unwrap();

    // One species at three plus five singles: six distinct, one triple.
    // Neither win condition holds.
    let mut collection = CardMultiset::empty(catalog.len());
    collection.add(parrot, 3);
    for name in ["flamingo", "owl", "sparrow", "cube", "sandwich"] {
        collection.push(catalog.lookup(name).unwrap());
    }
    game.set_collection(PlayerId::new(0), collection);
    game.set_hand(PlayerId::new(0), hand_of(&catalog, &["cube", "robin"]));
    game.set_row(0, vec![parrot, sparrow]);

    game.lay(cube, 0, Side::Right, false).unwrap();
    game.flock(None).unwrap();

    assert!(!game.ended());
    assert_eq!(game.winner(), None);
}

#[test]
fn emptied_hand_resets_the_round() {
    let catalog = standard();
    let mut game = GameState::new(Arc::clone(&catalog), 2, 1, 13);
    let parrot = catalog.lookup("parrot").unwrap();
    let cube = catalog.lookup("cube").unwrap();
    let sparrow = catalog.lookup("sparrow").unwrap();

    // The whole hand is cubes; laying them all empties it, and skipping
    // the open-lay draw keeps it empty through the flock.
    game.set_hand(PlayerId::new(0), hand_of(&catalog, &["cube", "cube"]));
    game.set_row(0, vec![parrot, sparrow]);

    game.lay(cube, 0, Side::Right, false).unwrap();
    assert!(game.current_hand().is_empty());
    game.flock(None).unwrap();

    // Round reset: both players hold 8 fresh cards, the acting player
    // keeps the turn.
    assert_eq!(game.hand(PlayerId::new(0)).len(), 8);
    assert_eq!(game.hand(PlayerId::new(1)).len(), 8);
    assert_eq!(game.current_player(), PlayerId::new(0));
    assert_eq!(game.phase(), Phase::Lay);
}

#[test]
fn open_lay_draws_two_into_hand() {
    let catalog = standard();
    let mut game = GameState::new(Arc::clone(&catalog), 2, 1, 21);
    let parrot = catalog.lookup("parrot").unwrap();
    let cube = catalog.lookup("cube").unwrap();
    let sparrow = catalog.lookup("sparrow").unwrap();

    game.set_hand(PlayerId::new(0), hand_of(&catalog, &["cube", "cube", "robin"]));
    game.set_row(0, vec![parrot, sparrow]);
    let deck_before = game.deck().len();

    game.lay(cube, 0, Side::Right, true).unwrap();

    // 3 cards - 2 cubes laid + 2 drawn.
    assert_eq!(game.current_hand().len(), 3);
    assert_eq!(game.deck().len(), deck_before - 2);
}

#[test]
fn recycling_keeps_the_discard_in_play() {
    let catalog = standard();
    let mut game = GameState::new(Arc::clone(&catalog), 2, 1, 17);
    let parrot = catalog.lookup("parrot").unwrap();
    let cube = catalog.lookup("cube").unwrap();
    let sparrow = catalog.lookup("sparrow").unwrap();
    let robin = catalog.lookup("robin").unwrap();

    // Deck one short of the open-lay draw; the discard covers the rest.
    game.set_deck(CardMultiset::from_birds(catalog.len(), [sparrow]));
    game.set_discard(CardMultiset::from_birds(catalog.len(), [robin, robin]));
    game.set_hand(PlayerId::new(0), hand_of(&catalog, &["cube", "cube", "owl"]));
    game.set_row(0, vec![parrot, sparrow]);

    game.lay(cube, 0, Side::Right, true).unwrap();

    assert!(!game.ended());
    assert_eq!(game.current_hand().len(), 3);
    assert!(game.discard_pile().is_empty());
    // sparrow + one robin drawn, one robin left as the new deck.
    assert_eq!(game.deck().len(), 1);
    assert_eq!(game.current_hand().count(sparrow), 1);
}

#[test]
fn full_games_conserve_every_card() {
    let catalog = standard();
    for seed in 0..5 {
        let mut game = GameState::new(Arc::clone(&catalog), 4, 4, seed);
        let mut rng = cubirds::GameRng::new(seed);

        while !game.ended() {
            cubirds::random_turn(&mut game, &mut rng).unwrap();
            assert!(game.is_conserved(), "seed {seed} broke conservation");
        }
    }
}

#[test]
fn analyzer_flock_verdicts_match_the_engine() {
    let catalog = standard();
    let mut game = GameState::new(Arc::clone(&catalog), 2, 4, 33);
    let bird = game.current_hand().iter().next().unwrap().0;
    game.lay(bird, 0, Side::Right, true).unwrap();

    let flocks = cubirds::available_flocks(game.current_hand(), game.catalog());
    let flockable = flocks
        .iter()
        .find(|&(_, &tier)| tier >= FlockTier::Small)
        .map(|(&bird, _)| bird);

    // Whatever the analyzer says is flockable the engine must accept, and
    // an analyzer-empty hand must still be allowed to pass.
    assert!(game.flock(flockable).is_ok());
}
