use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use astrotype::app::{App, AppSettings, Mode};
use astrotype::audio::SilentCues;
use astrotype::highscore::{HighscoreStore, SqliteHighscores};
use astrotype::menu::MenuKind;
use astrotype::runtime::{ChannelEvents, FrameLoop, GameEvent};
use astrotype::session::Phase;
use astrotype::stage::Stage;
use astrotype::words::WordLists;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// Headless integration using the internal runtime + App without a TTY.
// Events go through FrameLoop/ChannelEvents exactly like the terminal loop.

fn key(code: KeyCode) -> GameEvent {
    GameEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn new_app(words: &[&str]) -> App {
    App::new(
        WordLists::uniform(words).unwrap(),
        Box::new(SqliteHighscores::open_in_memory().unwrap()),
        Box::new(SilentCues),
        AppSettings {
            player_name: "headless".into(),
            seed: Some(99),
            ..AppSettings::default()
        },
    )
}

/// Feeds `events`, then advances `ticks` frames of `dt` seconds each.
/// Frames that fall due while the events are still being delivered are skipped.
fn drive(app: &mut App, events: Vec<GameEvent>, ticks: usize, dt: f64) {
    let (tx, rx) = mpsc::channel();
    let pending = events.len();
    for ev in events {
        tx.send(ev).unwrap();
    }
    drop(tx);

    let mut frames = FrameLoop::new(ChannelEvents::new(rx), Duration::from_millis(1));
    let mut delivered = 0;
    let mut remaining_ticks = ticks;
    while delivered < pending || remaining_ticks > 0 {
        match frames.next_event() {
            GameEvent::Key(k) => {
                app.on_key(&k);
                delivered += 1;
            }
            GameEvent::Resize => delivered += 1,
            GameEvent::Tick if delivered == pending => {
                app.on_tick(dt);
                remaining_ticks -= 1;
            }
            GameEvent::Tick => {}
        }
    }
}

fn start_events() -> Vec<GameEvent> {
    vec![key(KeyCode::Enter), key(KeyCode::Down), key(KeyCode::Enter)]
}

#[test]
fn headless_word_completion_scores_one() {
    let mut app = new_app(&["SUN"]);
    let mut events = start_events();
    events.extend("SUN".chars().map(|c| key(KeyCode::Char(c))));

    drive(&mut app, events, 1, 0.01);

    let session = app.session().expect("session should be running");
    assert_eq!(session.score(), 1);
    assert_eq!(session.remaining_word(), ['S', 'U', 'N']);
    assert_eq!(session.tokens().len(), 3);
}

#[test]
fn headless_wrong_key_only_shakes() {
    let mut app = new_app(&["SUN"]);
    let mut events = start_events();
    events.push(key(KeyCode::Char('z')));

    drive(&mut app, events, 0, 0.0);

    let session = app.session().unwrap();
    assert_eq!(session.shake_timer(), 0.3);
    assert_eq!(session.tokens().len(), 3);
    assert_eq!(session.health(), 3);
    assert_eq!(session.score(), 0);
}

#[test]
fn headless_words_that_reach_the_line_cost_health_until_game_over() {
    let mut app = new_app(&["STAR"]);
    drive(&mut app, start_events(), 0, 0.0);

    // 100 px/s from x = 800 to the threshold at 172 takes 6.28s
    drive(&mut app, vec![], 70, 0.1);
    let session = app.session().unwrap();
    assert_eq!(session.health(), 2);
    assert_eq!(session.score(), 0);
    assert_eq!(session.remaining_word().len(), 4);

    drive(&mut app, vec![], 200, 0.1);
    let session = app.session().unwrap();
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.health(), 0);

    let frozen = session.tokens().to_vec();
    drive(&mut app, vec![key(KeyCode::Char('s'))], 10, 0.1);
    assert_eq!(app.session().unwrap().tokens(), frozen.as_slice());
}

#[test]
fn headless_pause_then_leave_records_the_score() {
    let mut app = new_app(&["SUN"]);
    let mut events = start_events();
    events.extend("SUNSUN".chars().map(|c| key(KeyCode::Char(c))));
    events.push(key(KeyCode::Esc));
    drive(&mut app, events, 5, 0.5);

    let session = app.session().unwrap();
    assert_eq!(session.phase(), Phase::Paused);
    // nothing moved while paused
    assert_eq!(session.tokens()[0].x, 800.0);

    drive(&mut app, vec![key(KeyCode::Enter)], 0, 0.0);
    assert_eq!(app.mode(), Mode::Menu(MenuKind::Main));

    let top = app.store().top_scores(Stage::One, 10).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].player_name, "headless");
    assert_eq!(top[0].score, 2);
}

#[test]
fn headless_embedded_words_play_on_every_stage() {
    for stage in Stage::ALL {
        let mut app = App::new(
            WordLists::embedded().unwrap(),
            Box::new(SqliteHighscores::open_in_memory().unwrap()),
            Box::new(SilentCues),
            AppSettings {
                stage,
                seed: Some(stage.number() as u64),
                ..AppSettings::default()
            },
        );
        drive(&mut app, start_events(), 0, 0.0);

        let session = app.session().unwrap();
        assert_eq!(session.stage(), stage);
        let word: String = session.remaining_word().iter().collect();
        let typing: Vec<GameEvent> = word
            .chars()
            .map(|c| key(KeyCode::Char(c.to_ascii_lowercase())))
            .collect();

        drive(&mut app, typing, 0, 0.0);
        assert_eq!(app.session().unwrap().score(), 1);
    }
}

#[test]
fn headless_file_backed_store_keeps_scores() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscores.db");
    {
        let mut app = App::new(
            WordLists::uniform(&["SUN"]).unwrap(),
            Box::new(SqliteHighscores::open(&path).unwrap()),
            Box::new(SilentCues),
            AppSettings::default(),
        );
        let mut events = start_events();
        events.extend("sun".chars().map(|c| key(KeyCode::Char(c))));
        events.push(key(KeyCode::Esc));
        events.push(key(KeyCode::Enter));
        drive(&mut app, events, 0, 0.0);
    }

    let store = SqliteHighscores::open(&path).unwrap();
    let top = store.top_scores(Stage::One, 10).unwrap();
    assert_eq!(top[0].score, 1);
    assert_eq!(top[0].player_name, "player");
}

#[test]
fn headless_held_key_does_not_stop_the_words() {
    let mut app = new_app(&["SUN"]);
    drive(&mut app, start_events(), 0, 0.0);

    // auto-repeat of a wrong key, several presses per frame
    let (tx, rx) = mpsc::channel();
    let typist = thread::spawn(move || {
        let held = key(KeyCode::Char('q'));
        while tx.send(held.clone()).is_ok() {
            thread::sleep(Duration::from_millis(2));
        }
    });

    let mut frames = FrameLoop::new(ChannelEvents::new(rx), Duration::from_millis(10));
    let started = Instant::now();
    let (mut keys, mut ticks) = (0, 0);
    while started.elapsed() < Duration::from_millis(300) {
        match frames.next_event() {
            GameEvent::Key(k) => {
                app.on_key(&k);
                keys += 1;
            }
            GameEvent::Resize => {}
            GameEvent::Tick => {
                app.on_tick(0.05);
                ticks += 1;
            }
        }
    }
    drop(frames);
    typist.join().unwrap();

    assert!(keys > ticks, "keys={keys} ticks={ticks}");
    assert!(ticks >= 10, "only {ticks} frames in 300ms");
    let session = app.session().unwrap();
    assert!(session.tokens()[0].x < 800.0 - 0.05 * 100.0 * 9.0);
    assert_eq!(session.health(), 3);
}
