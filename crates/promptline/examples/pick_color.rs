//! Select prompt over a paginated list with descriptions and a disabled entry.
//!
//! Usage: cargo run -p promptline --example pick_color

use promptline::{Outcome, PromptConfig, SelectOption, SelectOptions, Terminal};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb(u8, u8, u8);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let terminal = Terminal::stdio()?;

    let options = SelectOptions::new(vec![
        SelectOption::new("red", Rgb(255, 0, 0)).with_description("#ff0000"),
        SelectOption::new("green", Rgb(0, 255, 0)).with_description("#00ff00"),
        SelectOption::new("blue", Rgb(0, 0, 255)).with_description("#0000ff"),
        SelectOption::new("cyan", Rgb(0, 255, 255)).with_description("#00ffff"),
        SelectOption::new("magenta", Rgb(255, 0, 255)).with_description("#ff00ff"),
        SelectOption::new("yellow", Rgb(255, 255, 0)).with_description("#ffff00"),
        SelectOption::new("black", Rgb(0, 0, 0)).with_description("#000000"),
        SelectOption::new("white", Rgb(255, 255, 255)).with_description("#ffffff"),
        SelectOption::new("ultraviolet", Rgb(0, 0, 0))
            .with_description("not visible to humans")
            .disabled(),
    ])
    .with_per_page(4);

    let config = PromptConfig::new("Favourite color?").with_initial(Rgb(0, 255, 0));
    match promptline::select(&terminal, config, options).await? {
        Outcome::Submitted(Rgb(r, g, b)) => println!("#{r:02x}{g:02x}{b:02x}"),
        Outcome::Cancelled => println!("No color picked."),
    }

    Ok(())
}
