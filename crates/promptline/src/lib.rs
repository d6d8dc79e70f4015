//! # Promptline: keypress-driven terminal prompts
//!
//! Promptline asks one question at a time on a raw-mode terminal and hands back
//! a typed [`Outcome`]: the submitted value, or [`Outcome::Cancelled`] when the
//! user pressed Escape / Ctrl+C or the prompt timed out.
//!
//! ## Quick Start
//!
//! ```no_run
//! use promptline::{Outcome, PromptConfig, Terminal};
//!
//! # async fn demo() -> promptline::PromptResult<()> {
//! let terminal = Terminal::stdio()?;
//! let config = PromptConfig::new("What is your name?")
//!     .with_validator(|name: &String| !name.is_empty());
//!
//! match promptline::text(&terminal, config).await? {
//!     Outcome::Submitted(name) => println!("Hello, {name}"),
//!     Outcome::Cancelled => println!("Bye"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Primitives** (`promptline-core`): keys, the raw-byte key parser, the
//!   keypress decoder and the console traits
//! - **Platform I/O** (`promptline-io`): the Unix terminal backend, mocks for
//!   tests and the debug file logger
//! - **Prompts** (`promptline`): the value pipeline, the async engine, the
//!   renderer and the six prompt variants (this crate)
//!
//! Every prompt function must be awaited inside a tokio runtime. A [`Terminal`]
//! serves one prompt at a time; starting a second one while the first is still
//! running fails with [`PromptError::TerminalBusy`].

use std::time::Duration;

pub use promptline_core::{
    decode, decode_with, display_width, rune_count, Action, ClearType, Color, ConsoleError,
    ConsoleInput, ConsoleOutput, ConsoleResult, EventLoopError, Key, KeyEvent, KeyParser,
    RawModeGuard, TextStyle,
};
pub use promptline_io::{MockConsoleInput, MockConsoleOutput};

mod config;
mod engine;
mod error;
pub mod pipeline;
pub mod renderer;
mod state;
mod terminal;
pub mod variants;

pub use config::{NumericOptions, PromptConfig, ToggleOptions};
pub use error::{PromptError, PromptResult};
pub use pipeline::{Validation, DEFAULT_ERROR};
pub use state::{Lifecycle, Outcome, StateCallback, StateSnapshot};
pub use terminal::Terminal;
pub use variants::{SelectOption, SelectOptions};

use variants::{ConfirmPrompt, NumericPrompt, SelectPrompt, TextPrompt, TogglePrompt};

/// Free text. An empty answer submits the initial value, if one is set.
pub async fn text(
    terminal: &Terminal,
    mut config: PromptConfig<String>,
) -> PromptResult<Outcome<String>> {
    let variant = TextPrompt::text(config.take_initial());
    engine::run(terminal, config, variant).await
}

/// Like [`text`], but the input is drawn as a fixed run of asterisks.
pub async fn password(
    terminal: &Terminal,
    mut config: PromptConfig<String>,
) -> PromptResult<Outcome<String>> {
    let variant = TextPrompt::password(config.take_initial());
    engine::run(terminal, config, variant).await
}

/// A number within `options.min..=options.max`, typed or stepped with Up/Down.
pub async fn numeric(
    terminal: &Terminal,
    mut config: PromptConfig<f64>,
    options: NumericOptions,
) -> PromptResult<Outcome<f64>> {
    let variant = NumericPrompt::new(config.take_initial(), options)?;
    engine::run(terminal, config, variant).await
}

/// One of two labelled states.
pub async fn toggle(
    terminal: &Terminal,
    mut config: PromptConfig<bool>,
    options: ToggleOptions,
) -> PromptResult<Outcome<bool>> {
    let variant = TogglePrompt::new(config.take_initial(), options);
    engine::run(terminal, config, variant).await
}

/// Yes or no. The answering key submits immediately.
pub async fn confirm(
    terminal: &Terminal,
    mut config: PromptConfig<bool>,
) -> PromptResult<Outcome<bool>> {
    let variant = ConfirmPrompt::new(config.take_initial());
    engine::run(terminal, config, variant).await
}

/// One option out of a list. Options are sorted by label; an initial value
/// highlights the option carrying it.
pub async fn select<T>(
    terminal: &Terminal,
    mut config: PromptConfig<T>,
    mut options: SelectOptions<T>,
) -> PromptResult<Outcome<T>>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    if let Some(initial) = config.take_initial() {
        if options.options.iter().any(|o| o.value == initial) {
            for option in options.options.iter_mut() {
                option.selected = option.value == initial;
            }
        }
    }
    let variant = SelectPrompt::new(options)?;
    engine::run(terminal, config, variant).await
}

/// Raw mode on, wait for a single keypress, raw mode off. `None` when nothing
/// was pressed within `timeout`.
pub async fn wait_for_key_press(
    terminal: &Terminal,
    timeout: Duration,
) -> PromptResult<Option<KeyEvent>> {
    engine::wait_for_key_press(terminal, timeout).await
}
