mod helpers;

use helpers::{instant_config, test_shell, test_shell_with_store};
use kindred::conversation::history::{Sender, HISTORY_CAP};
use kindred::pixel::PixelState;
use kindred::shell::Shell;
use kindred::storage::Store;
use std::sync::Arc;

#[tokio::test]
async fn anxious_input_gets_the_stress_response_exactly() {
    let shell = test_shell();
    shell
        .conversation
        .submit("I feel very anxious today")
        .unwrap()
        .await
        .unwrap();

    let history = shell.conversation.history();
    assert_eq!(history.len(), 2);
    assert_eq!(
        history[1].text,
        "I notice you're experiencing some stress. Would you like to try a brief breathing \
         practice to help center yourself? Sometimes just three deep breaths can create a \
         moment of spaciousness."
    );
}

#[tokio::test]
async fn ritual_keyword_wins_regardless_of_later_matches() {
    // "ritual" appears alongside stress and gratitude keywords; the ritual
    // rule is declared first and must win.
    let shell = test_shell();
    shell
        .conversation
        .submit("thank you, but this RITUAL leaves me anxious")
        .unwrap()
        .await
        .unwrap();

    let history = shell.conversation.history();
    assert!(history[1].text.contains("guided rituals"));
}

#[tokio::test]
async fn submit_while_in_flight_is_a_no_op() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let mut config = instant_config();
    // Slow the turn down so the second submit lands mid-flight.
    config.conversation.thinking_delay_ms = 200;
    let shell = Shell::build(&config, store);

    let first = shell.conversation.submit("hello there").unwrap();
    let len_after_first = shell.conversation.history().len();

    assert!(shell.conversation.submit("am I interrupting?").is_none());
    assert_eq!(shell.conversation.history().len(), len_after_first);

    first.await.unwrap();
    // Only the first exchange exists: one user turn, one assistant turn.
    let history = shell.conversation.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text, "hello there");
}

#[tokio::test]
async fn reset_mid_reveal_discards_the_partial_turn() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let mut config = instant_config();
    config.conversation.reveal_char_delay_ms = 20;
    let shell = Shell::build(&config, store);

    let handle = shell.conversation.submit("what do you think?").unwrap();

    // Let the reveal get going, then cancel it.
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    shell.conversation.reset();
    handle.await.unwrap();

    let history = shell.conversation.history();
    assert_eq!(history.len(), 1, "no assistant turn was committed");
    assert_eq!(history[0].sender, Sender::User);
    assert_eq!(shell.pixel.state(), PixelState::Idle);
    assert!(!shell.conversation.is_processing());

    // The engine accepts new input again.
    assert!(shell.conversation.submit("still there?").is_some());
}

#[tokio::test]
async fn history_is_capped_at_fifty_turns() {
    let shell = test_shell();
    for i in 0..30 {
        shell
            .conversation
            .submit(&format!("message number {i}"))
            .unwrap()
            .await
            .unwrap();
    }

    // 30 exchanges = 60 turns, capped to 50 with the oldest evicted.
    let history = shell.conversation.history();
    assert_eq!(history.len(), HISTORY_CAP);
    assert!(history[0].text != "message number 0");
}

#[tokio::test]
async fn history_survives_an_engine_reload() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    {
        let shell = test_shell_with_store(Arc::clone(&store));
        shell
            .conversation
            .submit("remember this exchange")
            .unwrap()
            .await
            .unwrap();
    }

    let shell = test_shell_with_store(store);
    let history = shell.conversation.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text, "remember this exchange");
}

#[tokio::test]
async fn clear_drops_history_and_welcome_returns() {
    let shell = test_shell();
    shell.conversation.submit("hello").unwrap().await.unwrap();
    assert!(!shell.conversation.history().is_empty());

    shell.conversation.clear();
    assert!(shell.conversation.history().is_empty());

    // With an empty history the greeting plays again.
    shell.conversation.welcome().unwrap().await.unwrap();
    assert_eq!(shell.conversation.history().len(), 1);
    assert_eq!(shell.conversation.history()[0].sender, Sender::Assistant);
}

#[tokio::test]
async fn reveal_feed_streams_partial_text() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let mut config = instant_config();
    config.conversation.reveal_char_delay_ms = 20;
    let shell = Shell::build(&config, store);

    let feed = shell.conversation.reveal_feed();
    let handle = shell.conversation.submit("good to see you").unwrap();

    // Mid-reveal the feed holds a strict prefix of the response.
    tokio::time::sleep(tokio::time::Duration::from_millis(60)).await;
    let partial = feed.borrow().clone();
    assert!(!partial.is_empty(), "reveal published incremental text");

    handle.await.unwrap();
    let history = shell.conversation.history();
    assert_eq!(history.len(), 2);
    assert!(history[1].text.starts_with(&partial));
    // Between reveals the feed is empty again.
    assert_eq!(*feed.borrow(), "");
}
