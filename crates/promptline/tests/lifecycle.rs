use std::sync::{Arc, Mutex};
use std::time::Duration;

use promptline::{
    ConsoleInput, Key, KeyEvent, MockConsoleInput, MockConsoleOutput, Outcome, PromptConfig, PromptError,
    StateSnapshot, Terminal,
};

fn mock_terminal() -> (Terminal, MockConsoleInput, MockConsoleOutput) {
    let input = MockConsoleInput::new();
    let output = MockConsoleOutput::new();
    (Terminal::new(input.clone(), output.clone()), input, output)
}

#[tokio::test(start_paused = true)]
async fn timeout_cancels_and_restores_terminal() {
    let (terminal, input, output) = mock_terminal();
    let config = PromptConfig::new("Still there?").with_timeout(Duration::from_millis(50));

    let started = tokio::time::Instant::now();
    let outcome = promptline::text(&terminal, config).await.unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert!(!input.is_raw_mode());
    assert_eq!(input.raw_mode_restored_count(), 1);
    assert!(output.get_output().contains("✖ Still there?"));
    assert!(output.get_output().ends_with("\r\n"));
    assert!(output.is_cursor_visible());
}

#[tokio::test(start_paused = true)]
async fn timeout_does_not_fire_after_submit() {
    let (terminal, input, _output) = mock_terminal();
    input.queue_key(Key::Enter);
    let config = PromptConfig::new("Quick")
        .with_initial("yes".to_string())
        .with_timeout(Duration::from_millis(50));

    let outcome = promptline::text(&terminal, config).await.unwrap();
    assert_eq!(outcome, Outcome::Submitted("yes".to_string()));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(input.raw_mode_enabled_count(), 1);
    assert_eq!(input.raw_mode_restored_count(), 1);
}

#[tokio::test]
async fn escape_cancels_with_trailing_newline() {
    let (terminal, input, output) = mock_terminal();
    input.queue_text_input("half");
    input.queue_key_event(KeyEvent::ctrl('c'));

    let outcome = promptline::text(&terminal, PromptConfig::new("Name")).await.unwrap();

    assert!(outcome.is_cancelled());
    assert!(output.get_output().ends_with("✖ Name · half\r\n"));
    assert!(!input.is_raw_mode());
    assert!(!input.is_running());
    assert!(!input.has_listener());
}

#[tokio::test(start_paused = true)]
async fn stale_async_validation_is_discarded() {
    let (terminal, input, _output) = mock_terminal();
    let seen = Arc::new(Mutex::new(Vec::<StateSnapshot<String>>::new()));
    let sink = seen.clone();
    let config = PromptConfig::new("Username")
        .with_async_validator(|name: String| async move {
            // The one-character value answers last
            let delay = if name.len() == 1 { 100 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if name.len() == 1 {
                Err("too short".to_string())
            } else {
                Ok(())
            }
        })
        .with_on_state(move |s: &StateSnapshot<String>| sink.lock().unwrap().push(s.clone()));

    input.queue_text_input("ab");
    let prompt_terminal = terminal.clone();
    let prompt = tokio::spawn(async move { promptline::text(&prompt_terminal, config).await });

    tokio::time::sleep(Duration::from_millis(200)).await;
    input.press(KeyEvent::new(Key::Enter));
    let outcome = prompt.await.unwrap().unwrap();

    assert_eq!(outcome, Outcome::Submitted("ab".to_string()));
    let seen = seen.lock().unwrap();
    assert!(seen.iter().all(|s| s.error_message.is_none()));
}

#[tokio::test(start_paused = true)]
async fn async_validation_error_appears_when_resolved() {
    let (terminal, input, output) = mock_terminal();
    let config = PromptConfig::new("Email").with_async_validator(|email: String| async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        email.contains('@')
    });

    input.queue_text_input("nobody");
    let prompt_terminal = terminal.clone();
    let prompt = tokio::spawn(async move { promptline::text(&prompt_terminal, config).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(output.get_output().contains(promptline::DEFAULT_ERROR));
    input.press(KeyEvent::new(Key::Escape));
    assert_eq!(prompt.await.unwrap().unwrap(), Outcome::Cancelled);
}

#[tokio::test]
async fn second_prompt_on_busy_terminal_is_refused() {
    let (terminal, input, _output) = mock_terminal();
    let first_terminal = terminal.clone();
    let first = tokio::spawn(async move {
        promptline::text(&first_terminal, PromptConfig::new("First")).await
    });

    for _ in 0..100 {
        if terminal.is_attached() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(terminal.is_attached());

    let second = promptline::confirm(&terminal, PromptConfig::new("Second")).await;
    assert!(matches!(second, Err(PromptError::TerminalBusy)));
    assert_eq!(input.raw_mode_enabled_count(), 1);

    input.press(KeyEvent::new(Key::Escape));
    assert_eq!(first.await.unwrap().unwrap(), Outcome::Cancelled);
    assert!(!terminal.is_attached());
}

#[tokio::test]
async fn prompts_run_back_to_back() {
    let (terminal, input, _output) = mock_terminal();
    input.queue_text_input("a");
    input.queue_key(Key::Enter);
    let first = promptline::text(&terminal, PromptConfig::new("One")).await.unwrap();

    input.queue_text_input("n");
    let second = promptline::confirm(&terminal, PromptConfig::new("Two")).await.unwrap();

    assert_eq!(first, Outcome::Submitted("a".to_string()));
    assert_eq!(second, Outcome::Submitted(false));
    assert_eq!(input.raw_mode_enabled_count(), 2);
    assert_eq!(input.raw_mode_restored_count(), 2);
}

#[tokio::test]
async fn panicking_callbacks_are_configuration_errors() {
    let (terminal, input, _output) = mock_terminal();

    let config = PromptConfig::new("Boom").with_validator(|_: &String| -> bool {
        panic!("validator exploded")
    });
    let result = promptline::text(&terminal, config).await;
    match result {
        Err(PromptError::InvalidConfiguration(reason)) => {
            assert!(reason.contains("validator exploded"))
        }
        other => panic!("expected a configuration error, got {other:?}"),
    }

    let config = PromptConfig::new("Boom").with_formatter(|_: &bool| -> String { panic!("nope") });
    let result = promptline::confirm(&terminal, config.with_initial(true)).await;
    assert!(matches!(result, Err(PromptError::InvalidConfiguration(_))));

    assert_eq!(input.raw_mode_enabled_count(), 0);
    assert!(!terminal.is_attached());
}

#[tokio::test]
async fn wait_for_key_press_returns_first_key() {
    let (terminal, input, _output) = mock_terminal();
    input.queue_text_input("qz");

    let key = promptline::wait_for_key_press(&terminal, Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(key.map(|k| k.key), Some(Key::Char('q')));
    assert!(!input.is_raw_mode());
    assert!(!terminal.is_attached());
}

#[tokio::test(start_paused = true)]
async fn wait_for_key_press_times_out() {
    let (terminal, input, _output) = mock_terminal();

    let key = promptline::wait_for_key_press(&terminal, Duration::from_millis(30))
        .await
        .unwrap();

    assert!(key.is_none());
    assert_eq!(input.raw_mode_enabled_count(), 1);
    assert!(!input.is_raw_mode());
}

#[tokio::test]
async fn state_callback_sees_lifecycle() {
    let (terminal, input, _output) = mock_terminal();
    let seen = Arc::new(Mutex::new(Vec::<StateSnapshot<bool>>::new()));
    let sink = seen.clone();
    let config = PromptConfig::new("Ready?")
        .with_on_state(move |s: &StateSnapshot<bool>| sink.lock().unwrap().push(s.clone()));
    input.queue_text_input("t");

    promptline::confirm(&terminal, config).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].value, Some(false));
    assert!(!seen[0].is_completed);
    assert_eq!(seen[1].value, Some(true));
    assert_eq!(seen[1].display_value, "yes");
    assert!(seen[1].is_submitted && seen[1].is_completed && !seen[1].is_cancelled);
}

#[cfg(feature = "serde")]
#[test]
fn outcomes_serialize_with_tag() {
    use serde_json::json;

    assert_eq!(
        serde_json::to_value(Outcome::Submitted(3)).unwrap(),
        json!({ "outcome": "submitted", "value": 3 })
    );
    assert_eq!(
        serde_json::to_value(Outcome::<i32>::Cancelled).unwrap(),
        json!({ "outcome": "cancelled" })
    );
}
