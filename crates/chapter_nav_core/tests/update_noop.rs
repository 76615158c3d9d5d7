use chapter_nav_core::{update, Msg, MutationBatch, SidebarState};

fn loaded(host: &str) -> SidebarState {
    let (state, _) = update(
        SidebarState::new(),
        Msg::PageLoaded {
            host: host.to_string(),
        },
    );
    state
}

#[test]
fn messages_after_teardown_change_nothing() {
    let (state, _) = update(loaded("chatgpt.com"), Msg::Teardown);

    for msg in [
        Msg::MutationsObserved(MutationBatch {
            added: 3,
            removed: 0,
        }),
        Msg::HeaderClicked,
        Msg::JumpToLatestClicked,
        Msg::PageLoaded {
            host: "chatgpt.com".to_string(),
        },
    ] {
        let (next, effects) = update(state.clone(), msg);
        assert_eq!(state, next);
        assert!(effects.is_empty());
    }
}

#[test]
fn unsupported_host_stays_silent() {
    let state = loaded("example.com");
    assert!(!state.view().enabled);

    let (state, effects) = update(state, Msg::MutationsObserved(Default::default()));
    assert!(effects.is_empty());
    let (_state, effects) = update(state, Msg::JumpToLatestClicked);
    assert!(effects.is_empty());
}

#[test]
fn loading_an_unsupported_host_leaves_state_as_it_was() {
    let state = SidebarState::new();
    let (next, effects) = update(
        state.clone(),
        Msg::PageLoaded {
            host: "example.com".to_string(),
        },
    );
    assert_eq!(state, next);
    assert!(effects.is_empty());
}
