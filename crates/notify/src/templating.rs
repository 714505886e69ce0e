//! Minijinja template rendering for slot notification messages.
//!
//! Templates are arbitrary strings (user-configurable), so a fresh
//! [`minijinja::Environment`] is created per render call.

use courtwatch_core::Slot;

use crate::traits::{Notification, NotifyError};

pub const DEFAULT_TITLE: &str = "Court Slot Available!";

pub const DEFAULT_MESSAGE_TEMPLATE: &str =
    "{{ court }}: {{ date }} at {{ time }} ({{ duration }} min)";

/// Slot fields exposed to templates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SlotContext {
    pub court: String,
    /// Long form, e.g. "Friday, 16 October 2026".
    pub date: String,
    /// ISO form, e.g. "2026-10-16".
    pub date_iso: String,
    /// 24-hour "HH:MM".
    pub time: String,
    /// 12-hour, e.g. "6:00 PM".
    pub time_12h: String,
    pub duration: u32,
    pub identity: String,
}

impl From<&Slot> for SlotContext {
    fn from(slot: &Slot) -> Self {
        Self {
            court: slot.court.clone(),
            date: slot.date.format("%A, %d %B %Y").to_string(),
            date_iso: slot.date.format("%Y-%m-%d").to_string(),
            time: slot.start.format("%H:%M").to_string(),
            time_12h: slot.start.format("%-I:%M %p").to_string(),
            duration: slot.duration_minutes,
            identity: slot.identity().to_string(),
        }
    }
}

/// Renders notification templates using minijinja.
#[derive(Debug)]
pub struct TemplateRenderer {
    _private: (),
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Builtin filters (`upper`, `lower`, `title`, ...) come with the
    /// `builtins` feature.
    fn build_env() -> minijinja::Environment<'static> {
        minijinja::Environment::new()
    }

    /// Render a template string with the given slot.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template is invalid or
    /// rendering fails.
    pub fn render(&self, template_str: &str, ctx: &SlotContext) -> Result<String, NotifyError> {
        let env = Self::build_env();
        env.render_str(template_str, ctx)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }

    /// Check that a template string parses, without evaluating it.
    pub fn validate(&self, template_str: &str) -> Result<(), NotifyError> {
        let env = Self::build_env();
        env.template_from_str(template_str)
            .map_err(|e| NotifyError::Template(e.to_string()))?;
        Ok(())
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns a [`Slot`] into a [`Notification`] with a fixed title and a
/// (validated) message template.
#[derive(Debug)]
pub struct MessageFormatter {
    renderer: TemplateRenderer,
    title: String,
    template: String,
}

impl MessageFormatter {
    /// Build a formatter. `template` defaults to [`DEFAULT_MESSAGE_TEMPLATE`].
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Config`] if the template does not parse.
    pub fn new(title: Option<String>, template: Option<String>) -> Result<Self, NotifyError> {
        let renderer = TemplateRenderer::new();
        let template = template.unwrap_or_else(|| DEFAULT_MESSAGE_TEMPLATE.to_string());
        renderer
            .validate(&template)
            .map_err(|e| NotifyError::Config(format!("invalid message template: {e}")))?;
        Ok(Self {
            renderer,
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            template,
        })
    }

    pub fn format(&self, slot: &Slot) -> Result<Notification, NotifyError> {
        let message = self.renderer.render(&self.template, &SlotContext::from(slot))?;
        Ok(Notification {
            title: self.title.clone(),
            message,
        })
    }
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self {
            renderer: TemplateRenderer::new(),
            title: DEFAULT_TITLE.to_string(),
            template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
        }
    }
}
