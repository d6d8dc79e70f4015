//! The prompt state machine shared by every variant.
//!
//! One task owns the prompt. It waits on three things at once: the next
//! keypress, the next finished validation, and the timeout. Each keypress is
//! decoded, applied to the variant and rendered before the next one is read.
//! Validations run as separate tasks tagged with the generation of the value
//! they checked; a result whose generation is no longer current is dropped.

use std::time::Duration;

use log::{debug, trace};
use tokio::task::{JoinError, JoinSet};
use tokio::time::{sleep_until, Instant};

use crate::config::{PromptConfig, Settings};
use crate::pipeline::Pipeline;
use crate::renderer::{Frame, Renderer, Span, Status};
use crate::state::{Lifecycle, Outcome, StateSnapshot};
use crate::terminal::{Attachment, Terminal};
use crate::variants::{Effect, Variant};
use crate::{decode_with, Action, Color, KeyEvent, PromptError, PromptResult, TextStyle};

type ValidationResult = (u64, Option<String>);

struct Engine<'t, V: Variant> {
    terminal: &'t Terminal,
    settings: Settings<V::Value>,
    pipeline: Pipeline<V::Value>,
    variant: V,
    renderer: Renderer,
    attachment: Attachment,
    lifecycle: Lifecycle,
    error: Option<String>,
    /// Bumped on every value change; only the latest validation counts
    generation: u64,
    validations: JoinSet<ValidationResult>,
    outcome: Option<Outcome<V::Value>>,
}

/// Drive `variant` on `terminal` until it is submitted or cancelled.
pub(crate) async fn run<V: Variant>(
    terminal: &Terminal,
    config: PromptConfig<V::Value>,
    variant: V,
) -> PromptResult<Outcome<V::Value>> {
    let (settings, pipeline) = config.into_parts();
    pipeline.probe(variant.value(&pipeline).as_ref(), "")?;

    let deadline = settings.timeout.map(|timeout| Instant::now() + timeout);
    let attachment = terminal.attach()?;
    debug!("prompt started: {:?}", settings.message);

    let mut engine = Engine {
        terminal,
        settings,
        pipeline,
        variant,
        renderer: Renderer::new(terminal.output().clone()),
        attachment,
        lifecycle: Lifecycle::Initial,
        error: None,
        generation: 0,
        validations: JoinSet::new(),
        outcome: None,
    };
    engine.render()?;

    let timeout = async move {
        match deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(timeout);

    loop {
        if let Some(outcome) = engine.outcome.take() {
            return Ok(outcome);
        }
        tokio::select! {
            key = engine.attachment.keys().recv() => match key {
                Some(key) => engine.handle_key(key).await?,
                None => {
                    debug!("key source closed");
                    engine.cancel()?;
                }
            },
            Some(joined) = engine.validations.join_next(), if !engine.validations.is_empty() => {
                engine.validation_done(joined)?;
            }
            _ = &mut timeout => {
                debug!("prompt timed out");
                engine.cancel()?;
            }
        }
    }
}

impl<V: Variant> Engine<'_, V> {
    async fn handle_key(&mut self, key: KeyEvent) -> PromptResult<()> {
        let action = decode_with(&key, |k| self.variant.decode_extra(k));
        trace!("key {} -> {:?}", key.name(), action);

        match action {
            None => self.bell(),
            Some(Action::Submit) => self.submit().await,
            Some(Action::Cancel) => self.cancel(),
            Some(Action::Reset) => self.reset(),
            Some(action) => match self.variant.apply(action, &self.pipeline) {
                Effect::Changed => {
                    self.value_changed();
                    self.render()
                }
                Effect::Moved => self.render(),
                Effect::Bell => self.bell(),
                Effect::Submit => self.submit().await,
            },
        }
    }

    fn value_changed(&mut self) {
        self.generation += 1;
        match self.variant.value(&self.pipeline) {
            Some(value) => {
                let generation = self.generation;
                let pending = self.pipeline.validation(value);
                self.validations
                    .spawn(async move { (generation, pending.await) });
            }
            None => self.error = None,
        }
    }

    fn validation_done(&mut self, joined: Result<ValidationResult, JoinError>) -> PromptResult<()> {
        let (generation, error) = match joined {
            Ok(result) => result,
            Err(e) if e.is_panic() => {
                return Err(PromptError::InvalidConfiguration(
                    "validator panicked".to_string(),
                ))
            }
            Err(_) => return Ok(()),
        };
        if generation != self.generation {
            trace!(
                "discarding validation #{generation}, current is #{}",
                self.generation
            );
            return Ok(());
        }
        self.error = error;
        self.render()
    }

    async fn submit(&mut self) -> PromptResult<()> {
        self.variant.finish_editing();
        if !self.variant.can_submit() {
            debug!("submit refused");
            return self.bell();
        }

        self.generation += 1;
        let Some(value) = self.variant.value(&self.pipeline) else {
            return self.bell();
        };
        self.error = self.pipeline.validation(value.clone()).await;
        if self.error.is_some() {
            self.bell()?;
            return self.render();
        }

        self.lifecycle = Lifecycle::Submitted;
        debug!("prompt submitted");
        self.render()?;
        self.finish(Outcome::Submitted(value))
    }

    fn cancel(&mut self) -> PromptResult<()> {
        self.error = None;
        self.lifecycle = Lifecycle::Cancelled;
        debug!("prompt cancelled");
        self.render()?;
        self.finish(Outcome::Cancelled)
    }

    fn reset(&mut self) -> PromptResult<()> {
        self.variant.reset();
        self.error = None;
        self.generation += 1;
        self.render()
    }

    fn finish(&mut self, outcome: Outcome<V::Value>) -> PromptResult<()> {
        self.validations.abort_all();
        self.renderer.finish()?;
        self.attachment.close();
        debug!("prompt closed");
        self.outcome = Some(outcome);
        Ok(())
    }

    fn bell(&self) -> PromptResult<()> {
        Ok(self.renderer.bell()?)
    }

    fn status(&self) -> Status {
        match self.lifecycle {
            Lifecycle::Submitted => Status::Submitted,
            Lifecycle::Cancelled => Status::Cancelled,
            _ if self.error.is_some() => Status::Error,
            _ => Status::Active,
        }
    }

    fn footer(&self) -> Option<Span> {
        if self.lifecycle.is_completed() {
            return None;
        }
        if let Some(error) = &self.error {
            return Some(Span::styled(error.clone(), TextStyle::fg(Color::Red)));
        }
        self.variant
            .hint()
            .or_else(|| self.settings.description.clone())
            .map(|text| Span::styled(text, TextStyle::dimmed()))
    }

    fn render(&mut self) -> PromptResult<()> {
        if self.lifecycle == Lifecycle::Initial {
            self.lifecycle = Lifecycle::Active;
        }
        let frame = Frame {
            status: self.status(),
            message: self.settings.message.clone(),
            body: self
                .variant
                .body(&self.pipeline, self.lifecycle.is_completed()),
            footer: self.footer(),
        };
        self.renderer.draw(&frame, self.terminal.columns())?;
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        let Some(on_state) = &self.settings.on_state else {
            return;
        };
        let snapshot = StateSnapshot::new(
            self.variant.value(&self.pipeline),
            self.variant.display_value(&self.pipeline),
            self.variant.cursor(&self.pipeline),
            self.error.clone(),
            self.lifecycle,
        );
        on_state(&snapshot);
    }
}

/// Resolve on the first keypress, or with `None` once `timeout` passes.
pub(crate) async fn wait_for_key_press(
    terminal: &Terminal,
    timeout: Duration,
) -> PromptResult<Option<KeyEvent>> {
    let mut attachment = terminal.attach()?;
    let key = tokio::time::timeout(timeout, attachment.keys().recv())
        .await
        .ok()
        .flatten();
    attachment.close();
    debug!("wait_for_key_press done: {:?}", key.as_ref().map(KeyEvent::name));
    Ok(key)
}
