//! A short questionnaire using every prompt kind.
//!
//! Usage: cargo run -p promptline --example survey

use std::time::Duration;

use promptline::{NumericOptions, Outcome, PromptConfig, Terminal, ToggleOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let terminal = Terminal::stdio()?;

    let name = promptline::text(
        &terminal,
        PromptConfig::new("What is your name?")
            .with_initial("anonymous".to_string())
            .with_description("Tab fills in the suggestion")
            .with_validator(|name: &String| {
                if name.trim().len() < 2 {
                    Err("at least two characters, please")
                } else {
                    Ok(())
                }
            }),
    )
    .await?;
    let Outcome::Submitted(name) = name else {
        println!("Cancelled.");
        return Ok(());
    };

    let secret = promptline::password(
        &terminal,
        PromptConfig::new("Pick a passphrase").with_async_validator(|phrase: String| async move {
            // Pretend to ask a breach database
            tokio::time::sleep(Duration::from_millis(150)).await;
            phrase.len() >= 8
        }),
    )
    .await?;

    let age = promptline::numeric(
        &terminal,
        PromptConfig::new("How old are you?"),
        NumericOptions::range(0.0, 130.0),
    )
    .await?;

    let newsletter = promptline::toggle(
        &terminal,
        PromptConfig::new("Subscribe to the newsletter?"),
        ToggleOptions {
            active: "yes".to_string(),
            inactive: "no".to_string(),
        },
    )
    .await?;

    let proceed = promptline::confirm(
        &terminal,
        PromptConfig::new("Send answers?").with_timeout(Duration::from_secs(20)),
    )
    .await?;

    println!("name:       {name}");
    println!("passphrase: {}", if secret.is_submitted() { "set" } else { "skipped" });
    println!("age:        {:?}", age.submitted());
    println!("newsletter: {:?}", newsletter.submitted());
    println!("sent:       {}", proceed == Outcome::Submitted(true));

    Ok(())
}
