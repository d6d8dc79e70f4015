//! Prompt variants
//!
//! Each variant owns its edit state and answers three questions for the shared
//! engine: what an action does to that state, what value the state currently
//! holds, and how the state is drawn.

use crate::pipeline::Pipeline;
use crate::renderer::Body;
use crate::{Action, KeyEvent};

pub mod numeric;
pub mod select;
pub mod text;
pub mod toggle;

pub use numeric::NumericPrompt;
pub use select::{SelectOption, SelectOptions, SelectPrompt};
pub use text::{EditBuffer, TextPrompt};
pub use toggle::{ConfirmPrompt, TogglePrompt};

/// What applying an action did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The value changed: validate and redraw
    Changed,
    /// Only the view changed: redraw
    Moved,
    /// Rejected: ring the bell
    Bell,
    /// The value changed and the prompt submits right away
    Submit,
}

pub trait Variant: Send + 'static {
    type Value: Clone + Send + Sync + 'static;

    /// Key bindings on top of the base decoder table
    fn decode_extra(&self, _key: &KeyEvent) -> Option<Action> {
        None
    }

    /// Apply an editing or navigation action. Submit, Cancel and Reset never
    /// reach a variant.
    fn apply(&mut self, action: Action, pipeline: &Pipeline<Self::Value>) -> Effect;

    /// The value that would be validated or submitted now
    fn value(&self, pipeline: &Pipeline<Self::Value>) -> Option<Self::Value>;

    /// Formatted and masked value as shown on screen
    fn display_value(&self, pipeline: &Pipeline<Self::Value>) -> String;

    /// Text cursor as a character offset into the display value
    fn cursor(&self, pipeline: &Pipeline<Self::Value>) -> usize {
        self.display_value(pipeline).chars().count()
    }

    fn body(&self, pipeline: &Pipeline<Self::Value>, done: bool) -> Body;

    /// Footer text that takes precedence over the configured description
    fn hint(&self) -> Option<String> {
        None
    }

    /// Whether the current state may be submitted at all
    fn can_submit(&self) -> bool {
        true
    }

    /// Called before submitting; text variants move the cursor to the end
    fn finish_editing(&mut self) {}

    /// Back to the initial value
    fn reset(&mut self);
}
