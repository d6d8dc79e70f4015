use std::sync::{Arc, Mutex};

use promptline::{
    Key, KeyEvent, MockConsoleInput, MockConsoleOutput, NumericOptions, Outcome, PromptConfig,
    SelectOption, SelectOptions, StateSnapshot, Terminal, ToggleOptions,
};

fn mock_terminal() -> (Terminal, MockConsoleInput, MockConsoleOutput) {
    let input = MockConsoleInput::new();
    let output = MockConsoleOutput::new();
    (Terminal::new(input.clone(), output.clone()), input, output)
}

type Snapshots<T> = Arc<Mutex<Vec<StateSnapshot<T>>>>;

/// Config that records every state snapshot
fn recording<T: Clone + Send + 'static>(message: &str) -> (PromptConfig<T>, Snapshots<T>) {
    let seen: Snapshots<T> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let config = PromptConfig::new(message).with_on_state(move |s: &StateSnapshot<T>| {
        sink.lock().unwrap().push(s.clone());
    });
    (config, seen)
}

#[tokio::test]
async fn text_submits_typed_value() {
    let (terminal, input, output) = mock_terminal();
    input.queue_text_input("bob");
    input.queue_key(Key::Enter);

    let outcome = promptline::text(&terminal, PromptConfig::new("Name")).await.unwrap();

    assert_eq!(outcome, Outcome::Submitted("bob".to_string()));
    assert!(output.get_output().contains("✔ Name · bob"));
    assert!(output.get_output().ends_with("\r\n"));
    assert!(!input.is_raw_mode());
    assert!(!terminal.is_attached());
}

#[tokio::test]
async fn text_round_trip_leaves_empty_display() {
    let (terminal, input, _output) = mock_terminal();
    let (config, seen) = recording::<String>("Name");
    input.queue_text_input("abc");
    for _ in 0..3 {
        input.queue_key(Key::Backspace);
    }
    input.queue_key(Key::Escape);

    let outcome = promptline::text(&terminal, config).await.unwrap();
    assert_eq!(outcome, Outcome::Cancelled);

    let seen = seen.lock().unwrap();
    let before_cancel = &seen[seen.len() - 2];
    assert_eq!(before_cancel.display_value, "");
    assert_eq!(before_cancel.cursor, 0);
    assert!(!before_cancel.is_completed);
}

#[tokio::test]
async fn empty_text_submits_initial_value() {
    let (terminal, input, _output) = mock_terminal();
    input.queue_key(Key::Enter);

    let config = PromptConfig::new("Project").with_initial("my-app".to_string());
    let outcome = promptline::text(&terminal, config).await.unwrap();
    assert_eq!(outcome, Outcome::Submitted("my-app".to_string()));
}

#[tokio::test]
async fn failed_validation_blocks_submit() {
    let (terminal, input, output) = mock_terminal();
    let (config, seen) = recording::<String>("Name");
    let config = config.with_validator(|name: &String| !name.is_empty());
    input.queue_key(Key::Enter);
    input.queue_text_input("x");
    input.queue_key(Key::Enter);

    let outcome = promptline::text(&terminal, config).await.unwrap();

    assert_eq!(outcome, Outcome::Submitted("x".to_string()));
    assert!(output.bell_count() >= 1);
    let seen = seen.lock().unwrap();
    let rejected = seen.iter().find(|s| s.is_error).unwrap();
    assert_eq!(
        rejected.error_message.as_deref(),
        Some(promptline::DEFAULT_ERROR)
    );
    assert!(!rejected.is_submitted);
    assert!(seen.last().is_some_and(|s| s.is_submitted && !s.is_error));
}

#[tokio::test]
async fn validator_message_is_shown_in_footer() {
    let (terminal, input, output) = mock_terminal();
    let config = PromptConfig::new("Port").with_validator(|port: &String| {
        if port.parse::<u16>().is_ok() {
            Ok(())
        } else {
            Err(format!("{port} is not a port"))
        }
    });
    input.queue_text_input("http");
    input.queue_key(Key::Enter);
    input.queue_key_event(KeyEvent::ctrl('c'));

    let outcome = promptline::text(&terminal, config).await.unwrap();
    assert_eq!(outcome, Outcome::Cancelled);
    assert!(output.get_output().contains("http is not a port"));
}

#[tokio::test]
async fn submit_snaps_cursor_to_end() {
    let (terminal, input, _output) = mock_terminal();
    let (config, seen) = recording::<String>("Greeting");
    input.queue_text_input("hello");
    input.queue_key(Key::Left);
    input.queue_key(Key::Left);
    input.queue_key(Key::Enter);

    promptline::text(&terminal, config).await.unwrap();

    let seen = seen.lock().unwrap();
    assert!(seen.iter().any(|s| s.cursor == 3 && !s.is_completed));
    let last = seen.last().unwrap();
    assert_eq!(last.display_value, "hello");
    assert_eq!(last.cursor, 5);
    for snapshot in seen.iter() {
        assert!(snapshot.cursor <= snapshot.display_value.chars().count());
        assert_eq!(
            snapshot.is_completed,
            snapshot.is_submitted || snapshot.is_cancelled
        );
        assert!(!(snapshot.is_submitted && snapshot.is_cancelled));
    }
}

#[tokio::test]
async fn password_never_echoes_input() {
    let (terminal, input, output) = mock_terminal();
    input.queue_text_input("hunter2");
    input.queue_key(Key::Enter);

    let outcome = promptline::password(&terminal, PromptConfig::new("Password"))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Submitted("hunter2".to_string()));
    let screen = output.get_output();
    assert!(!screen.contains("hunter"));
    assert!(screen.contains("✔ Password · ********"));
}

#[tokio::test]
async fn numeric_first_up_starts_at_min() {
    let (terminal, input, _output) = mock_terminal();
    input.queue_key(Key::Up);
    input.queue_key(Key::Up);
    input.queue_key(Key::Enter);

    let outcome = promptline::numeric(
        &terminal,
        PromptConfig::new("Count"),
        NumericOptions::range(0.0, 10.0),
    )
    .await
    .unwrap();
    assert_eq!(outcome, Outcome::Submitted(1.0));
}

#[tokio::test]
async fn numeric_without_value_refuses_submit() {
    let (terminal, input, output) = mock_terminal();
    input.queue_key(Key::Enter);
    input.queue_text_input("42");
    input.queue_key(Key::Enter);

    let outcome = promptline::numeric(
        &terminal,
        PromptConfig::new("Answer"),
        NumericOptions::range(0.0, 40.0),
    )
    .await
    .unwrap();
    assert_eq!(outcome, Outcome::Submitted(40.0));
    assert_eq!(output.bell_count(), 1);
}

#[tokio::test]
async fn numeric_accepts_digits_starting_below_min() {
    let (terminal, input, output) = mock_terminal();
    input.queue_text_input("25");
    input.queue_key(Key::Enter);

    let outcome = promptline::numeric(
        &terminal,
        PromptConfig::new("Age"),
        NumericOptions::range(10.0, 99.0),
    )
    .await
    .unwrap();
    assert_eq!(outcome, Outcome::Submitted(25.0));
    assert!(output.get_output().contains("✔ Age · 25"));
}

#[tokio::test]
async fn numeric_submits_clamped_value() {
    let (terminal, input, output) = mock_terminal();
    input.queue_text_input("7");
    input.queue_key(Key::Enter);

    let outcome = promptline::numeric(
        &terminal,
        PromptConfig::new("Workers"),
        NumericOptions::range(10.0, 99.0),
    )
    .await
    .unwrap();
    assert_eq!(outcome, Outcome::Submitted(10.0));
    assert!(output.get_output().contains("✔ Workers · 10"));
}

#[tokio::test]
async fn numeric_rejects_bad_range() {
    let (terminal, input, _output) = mock_terminal();
    let result = promptline::numeric(
        &terminal,
        PromptConfig::new("Broken"),
        NumericOptions::range(10.0, 0.0),
    )
    .await;
    assert!(matches!(
        result,
        Err(promptline::PromptError::InvalidConfiguration(_))
    ));
    assert_eq!(input.raw_mode_enabled_count(), 0);
}

#[tokio::test]
async fn select_moves_down_and_submits() {
    let (terminal, input, output) = mock_terminal();
    input.queue_key(Key::Down);
    input.queue_key(Key::Enter);

    let options = SelectOptions::<String>::new(["red", "green", "blue"]);
    let outcome = promptline::select(&terminal, PromptConfig::new("Color"), options)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Submitted("green".to_string()));
    assert!(output.get_output().contains("blue  green  red"));
}

#[tokio::test]
async fn select_vi_keys_and_initial_value() {
    let (terminal, input, _output) = mock_terminal();
    input.queue_text_input("jjk");
    input.queue_key(Key::Enter);

    let options = SelectOptions::new(vec![
        SelectOption::new("one", 1),
        SelectOption::new("two", 2),
        SelectOption::new("three", 3),
    ]);
    // Sorted: one, three, two. Starts on "one", j j k lands on "three".
    let config = PromptConfig::new("Number").with_initial(1);
    let outcome = promptline::select(&terminal, config, options).await.unwrap();
    assert_eq!(outcome, Outcome::Submitted(3));
}

#[tokio::test]
async fn select_disabled_option_cannot_be_submitted() {
    let (terminal, input, output) = mock_terminal();
    let (config, seen) = recording::<&'static str>("Plan");
    input.queue_key(Key::Enter);
    input.queue_key(Key::Escape);

    let options = SelectOptions::new(vec![
        SelectOption::new("enterprise", "enterprise").disabled(),
        SelectOption::new("free", "free"),
    ]);
    let outcome = promptline::select(&terminal, config, options).await.unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert!(output.bell_count() >= 1);
    assert!(seen.lock().unwrap().iter().all(|s| !s.is_submitted));
}

#[tokio::test]
async fn select_description_is_shown_while_highlighted() {
    let (terminal, input, output) = mock_terminal();
    input.queue_key(Key::Enter);

    let options = SelectOptions::new(vec![
        SelectOption::new("apt", "apt").with_description("Debian and Ubuntu"),
        SelectOption::new("dnf", "dnf"),
    ]);
    let config = PromptConfig::new("Package manager").with_description("pick one");
    promptline::select(&terminal, config, options).await.unwrap();
    let screen = output.get_output();
    assert!(screen.contains("Debian and Ubuntu"));
    assert!(!screen.contains("pick one"));
}

#[tokio::test]
async fn select_rejects_empty_options() {
    let (terminal, _input, _output) = mock_terminal();
    let options: SelectOptions<String> = SelectOptions::new(Vec::<String>::new());
    let result = promptline::select(&terminal, PromptConfig::new("Nothing"), options).await;
    assert!(matches!(
        result,
        Err(promptline::PromptError::InvalidConfiguration(_))
    ));
    assert!(!terminal.is_attached());
}

#[tokio::test]
async fn toggle_switches_with_arrows() {
    let (terminal, input, output) = mock_terminal();
    input.queue_key(Key::Right);
    input.queue_key(Key::Enter);

    let outcome = promptline::toggle(
        &terminal,
        PromptConfig::new("Dark mode"),
        ToggleOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(outcome, Outcome::Submitted(true));
    assert!(output.get_output().contains("✔ Dark mode · on"));
}

#[tokio::test]
async fn confirm_submits_on_answer_key() {
    let (terminal, input, output) = mock_terminal();
    input.queue_text_input("y");

    let outcome = promptline::confirm(&terminal, PromptConfig::new("Continue?"))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Submitted(true));
    assert!(output.get_output().contains("(y/N)"));
    assert!(output.get_output().contains("✔ Continue? · yes"));
    assert!(!input.is_raw_mode());
}

#[tokio::test]
async fn confirm_ignores_other_keys() {
    let (terminal, input, output) = mock_terminal();
    input.queue_text_input("xn");

    let outcome = promptline::confirm(
        &terminal,
        PromptConfig::new("Delete everything?").with_initial(true),
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::Submitted(false));
    assert_eq!(output.bell_count(), 1);
}
