//! Wait for a single keypress with a timeout.
//!
//! Usage: cargo run -p promptline --example press_any_key

use std::time::Duration;

use promptline::Terminal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let terminal = Terminal::stdio()?;

    println!("Press any key within 5 seconds...");
    match promptline::wait_for_key_press(&terminal, Duration::from_secs(5)).await? {
        Some(key) => println!("You pressed {} ({:?})", key.name(), promptline::decode(&key)),
        None => println!("Too slow."),
    }

    Ok(())
}
