use longedrome_game::{
    ActionRejection, BattleSession, Color, GameConfig, GamePhase, PendingStep, RoundFlags,
    SessionState, StepStatus, SubmissionRejection, TurnVerdict, find_longest_palindrome,
    resolve_enemy_turn, run_step, start_turn, submit_selection, toggle_selection, verdict_dialog,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn select_range(session: &mut BattleSession, range: std::ops::Range<usize>) {
    for index in range {
        session.toggle_selection(index).unwrap();
    }
}

fn select_optimal(session: &mut BattleSession) {
    let span = session.state().optimal.indices();
    select_range(session, span);
}

fn board(sequence: Vec<Color>) -> SessionState {
    let mut state = SessionState::default();
    state.optimal = find_longest_palindrome(&sequence);
    state.sequence = sequence;
    state.phase = GamePhase::UserTurn;
    state.turn_count = 1;
    state
}

#[test]
fn short_answer_costs_twenty_one_hp_on_turn_one() {
    use Color::{Black, Blue, Green, Red, Yellow};
    let cfg = GameConfig::default();
    let mut state = board(vec![Red, Blue, Green, Yellow, Green, Blue, Red, Black]);
    assert_eq!(state.optimal.length, 7);
    for index in 2..5 {
        state = toggle_selection(&state, index).next;
    }
    let submitted = submit_selection(&state);
    assert!(submitted.valid);
    let resolution =
        resolve_enemy_turn(&submitted.next, &cfg, &mut ChaCha20Rng::seed_from_u64(1)).unwrap();
    assert_eq!(resolution.damage, 21);
    assert_eq!(resolution.next.player.hp, 79);
    assert_eq!(resolution.verdict, TurnVerdict::Continue);
}

#[test]
fn selection_toggle_is_an_involution() {
    let state = board(vec![Color::Red, Color::Blue, Color::Red]);
    let once = toggle_selection(&state, 1).next;
    let twice = toggle_selection(&once, 1).next;
    assert_eq!(twice.selection, state.selection);
}

#[test]
fn flags_reset_only_on_round_start() {
    let mut session = BattleSession::with_defaults(31);
    session.complete_tutorial().unwrap();
    session.talk().unwrap();
    session.respond("hello").unwrap();
    assert!(session.state().flags.talked);

    session.start_turn().unwrap();
    assert_eq!(session.state().flags, RoundFlags::default());
    session.toggle_selection(0).unwrap();
    let pending = session.submit().unwrap();
    assert!(session.state().flags.submitted);

    let mut step = Some(pending);
    while let Some(next) = step {
        step = session.fire(next).pending;
        assert!(session.state().flags.submitted);
    }
    assert_eq!(session.phase(), GamePhase::Idle);
    assert!(session.state().flags.submitted);
    assert_eq!(session.talk().map(|_| ()), Ok(()));
}

#[test]
fn stale_steps_never_touch_state() {
    let cfg = GameConfig::default();
    let mut rng = ChaCha20Rng::seed_from_u64(8);
    let mut state = board(vec![Color::Red, Color::Blue, Color::Red]);
    state = toggle_selection(&state, 1).next;
    let outcome = submit_selection(&state);
    let pending = outcome.pending.unwrap();
    let moved_on = PendingStep {
        epoch: pending.epoch + 1,
        ..pending
    };
    let fired = run_step(&outcome.next, &cfg, &mut rng, moved_on);
    assert_eq!(fired.status, StepStatus::Stale);
    assert_eq!(fired.next, outcome.next);
}

#[test]
fn submissions_outside_user_turn_are_refused() {
    let mut session = BattleSession::with_defaults(4);
    assert_eq!(
        session.submit(),
        Err(SubmissionRejection::WrongPhase(GamePhase::Tutorial))
    );
    session.complete_tutorial().unwrap();
    assert_eq!(
        session.toggle_selection(0),
        Err(ActionRejection::WrongPhase {
            action: "selecting colors",
            phase: GamePhase::Idle
        })
    );
    let idle = session.state().clone();
    let turn = start_turn(&idle);
    assert!(turn.applied());
}

#[test]
fn careless_player_loses_hp_and_eventually_the_game() {
    let mut session = BattleSession::with_defaults(99);
    session.complete_tutorial().unwrap();
    let mut last = TurnVerdict::Continue;
    for _ in 0..40 {
        if session.phase() == GamePhase::Idle {
            session.start_turn().unwrap();
        }
        session.toggle_selection(0).unwrap();
        let (_, verdict) = session.play_selection().unwrap();
        last = verdict;
        if session.phase().is_terminal() {
            break;
        }
    }
    assert!(session.phase().is_terminal());
    assert_eq!(last, TurnVerdict::Defeat);
    assert_eq!(session.phase(), GamePhase::GameOver);
}

#[test]
fn diplomat_wins_without_final_battle() {
    let mut session = BattleSession::with_defaults(7);
    session.complete_tutorial().unwrap();
    let max_turns = session.config().max_turns;
    let mut unlocked = 0;
    let mut verdict = TurnVerdict::Continue;
    for _ in 0..max_turns {
        session.talk().unwrap();
        let report = session.respond("I respect your wisdom and harmony").unwrap();
        if report.home_unlocked {
            unlocked += 1;
        }
        session.start_turn().unwrap();
        select_optimal(&mut session);
        verdict = session.play_selection().unwrap().1;
    }
    assert_eq!(unlocked, 1);
    assert_eq!(verdict, TurnVerdict::Victory);
    assert_eq!(session.phase(), GamePhase::Victory);
    assert!(!session.state().final_battle);
    assert_eq!(
        session.verdict_dialog(),
        verdict_dialog(TurnVerdict::Victory, false)
    );
}

#[test]
fn final_battle_failure_is_game_over() {
    let mut session = BattleSession::with_defaults(12);
    session.complete_tutorial().unwrap();
    for _ in 0..session.config().max_turns {
        session.start_turn().unwrap();
        select_optimal(&mut session);
        session.play_selection().unwrap();
    }
    assert!(session.state().final_battle);
    assert_eq!(session.phase(), GamePhase::UserTurn);
    let hp = session.state().player.hp;
    session.toggle_selection(0).unwrap();
    let (damage, verdict) = session.play_selection().unwrap();
    assert_eq!(damage, 0);
    assert_eq!(verdict, TurnVerdict::Defeat);
    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.state().player.hp, hp);
    assert_eq!(
        session.verdict_dialog()[0],
        "You have failed the final challenge."
    );
}

#[test]
fn restored_selection_past_the_board_is_refused() {
    let mut state = board(vec![Color::Red, Color::Blue, Color::Red]);
    state.selection = longedrome_game::Selection::from_range(0..6);
    let mut session = BattleSession::from_state(state, GameConfig::default(), 5).unwrap();
    assert_eq!(session.submit(), Err(SubmissionRejection::OutOfRange));
    assert_eq!(session.phase(), GamePhase::UserTurn);
    assert!(!session.state().flags.submitted);
    assert_eq!(session.state().player.hp, 100);
}

#[test]
fn home_trip_and_rest() {
    let mut session = BattleSession::with_defaults(15);
    session.complete_tutorial().unwrap();
    assert_eq!(session.go_home(), Err(ActionRejection::HomeLocked));
    assert!(session.state().feedback.contains("blocks your path"));

    session.with_state_mut(|state| {
        state.enemy.amiability = 80;
        state.player.hp = 40;
    });
    session.go_home().unwrap();
    assert_eq!(session.phase(), GamePhase::Home);
    assert!(session.state().sequence.is_empty());
    session.rest().unwrap();
    assert_eq!(session.state().player.hp, 70);
    assert_eq!(session.rest(), Err(ActionRejection::AlreadyRested));
    let reflection = session.talk().unwrap();
    assert!(reflection.reflection);

    session.return_to_temple().unwrap();
    assert_eq!(session.phase(), GamePhase::Idle);
    assert!(session.state().optimal.length >= 5);
}

#[test]
fn magic_then_submit_is_always_optimal() {
    let mut session = BattleSession::with_defaults(21);
    session.complete_tutorial().unwrap();
    session.start_turn().unwrap();
    session.cast_magic().unwrap();
    assert_eq!(session.state().player.mp, 30);
    let (damage, _) = session.play_selection().unwrap();
    assert_eq!(damage, 0);

    session.start_turn().unwrap();
    session.cast_magic().unwrap();
    session.play_selection().unwrap();
    session.start_turn().unwrap();
    assert_eq!(
        session.cast_magic(),
        Err(ActionRejection::InsufficientMp {
            cost: 20,
            available: 10
        })
    );
}
