use std::sync::Once;
use std::time::Duration;

use chapter_nav_core::{update, Effect, MutationBatch, Msg, SidebarState, TimerToken};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(nav_logging::initialize_for_tests);
}

fn loaded() -> SidebarState {
    let (state, _) = update(
        SidebarState::new(),
        Msg::PageLoaded {
            host: "chatgpt.com".to_string(),
        },
    );
    state
}

fn batch() -> Msg {
    Msg::MutationsObserved(MutationBatch {
        added: 1,
        removed: 0,
    })
}

#[test]
fn first_batch_schedules_one_timer() {
    init_logging();
    let (state, effects) = update(loaded(), batch());

    assert_eq!(
        effects,
        vec![Effect::ScheduleSync {
            token: TimerToken(1),
            delay: Duration::from_millis(500),
        }]
    );
    assert!(state.view().sync_pending);
}

#[test]
fn each_batch_supersedes_the_pending_timer() {
    init_logging();
    let (state, _) = update(loaded(), batch());
    let (state, effects) = update(state, batch());

    assert_eq!(
        effects,
        vec![
            Effect::CancelSync {
                token: TimerToken(1)
            },
            Effect::ScheduleSync {
                token: TimerToken(2),
                delay: Duration::from_millis(500),
            },
        ]
    );

    // The superseded token no longer starts a pass.
    let (state, effects) = update(state, Msg::SyncTimerFired(TimerToken(1)));
    assert!(effects.is_empty());
    assert!(state.view().sync_pending);

    let (state, effects) = update(state, Msg::SyncTimerFired(TimerToken(2)));
    assert_eq!(
        effects,
        vec![Effect::ObservePage {
            query: ".whitespace-pre-wrap".to_string()
        }]
    );
    assert!(!state.view().sync_pending);
}

#[test]
fn burst_of_batches_yields_a_single_pass() {
    init_logging();
    let mut state = loaded();
    let passes_before = state.passes();
    let mut live = None;
    for _ in 0..25 {
        let (next, effects) = update(state, batch());
        state = next;
        live = effects.iter().find_map(|effect| match effect {
            Effect::ScheduleSync { token, .. } => Some(*token),
            _ => None,
        });
    }
    let live = live.expect("schedule effect");

    let mut observe_count = 0;
    for n in 1..=live.0 {
        let (next, effects) = update(state, Msg::SyncTimerFired(TimerToken(n)));
        state = next;
        observe_count += effects
            .iter()
            .filter(|e| matches!(e, Effect::ObservePage { .. }))
            .count();
    }
    assert_eq!(observe_count, 1);
    assert_eq!(state.passes(), passes_before + 1);
}

#[test]
fn teardown_cancels_pending_timer_and_detaches() {
    init_logging();
    let (state, _) = update(loaded(), batch());
    let (state, effects) = update(state, Msg::Teardown);

    assert_eq!(
        effects,
        vec![
            Effect::CancelSync {
                token: TimerToken(1)
            },
            Effect::DetachObserver,
        ]
    );

    let (_state, effects) = update(state, batch());
    assert!(effects.is_empty());
}

#[test]
fn page_entering_back_forward_cache_stays_attached() {
    init_logging();
    let (state, _) = update(loaded(), batch());
    let (state, effects) = update(state, Msg::PageHidden { persisted: true });
    assert!(effects.is_empty());
    assert!(state.view().sync_pending);

    // Restored from the cache: mutations still reschedule the pass.
    let (_state, effects) = update(state, batch());
    assert_eq!(
        effects,
        vec![
            Effect::CancelSync {
                token: TimerToken(1)
            },
            Effect::ScheduleSync {
                token: TimerToken(2),
                delay: Duration::from_millis(500),
            },
        ]
    );
}

#[test]
fn page_unloading_for_good_tears_down() {
    init_logging();
    let (state, _) = update(loaded(), batch());
    let (_state, effects) = update(state, Msg::PageHidden { persisted: false });
    assert_eq!(
        effects,
        vec![
            Effect::CancelSync {
                token: TimerToken(1)
            },
            Effect::DetachObserver,
        ]
    );
}
