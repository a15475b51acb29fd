use std::io::{self, Write};

use kidsafe_core::{
    AnalysisResult, AppViewModel, BackendState, ChatMessage, NotificationKind, Resolution, Role,
    SessionId,
};

use super::constants::{BANNER, CATALOG_EMPTY, CATALOG_LOADING, MANUAL_HINT, PROMPT};
use crate::platform::effects::ResultsViewport;

/// Prints view changes as lines. Only differences from the previous frame
/// are written, so repeated renders of the same view are silent.
pub struct TerminalRenderer<W: Write> {
    out: W,
    last: AppViewModel,
    revealed: Option<SessionId>,
    shown_messages: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: AppViewModel::default(),
            revealed: None,
            shown_messages: 0,
        }
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "{BANNER}")?;
        writeln!(self.out, "Checking the analysis service...")?;
        self.out.flush()
    }

    pub fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "{PROMPT}")?;
        self.out.flush()
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Lists catalog brands, starring those with an instant analysis.
    pub fn catalog(
        &mut self,
        view: &AppViewModel,
        has_analysis: impl Fn(&str) -> bool,
    ) -> io::Result<()> {
        if view.catalog.is_empty() {
            let text = if view.catalog_loading {
                CATALOG_LOADING
            } else {
                CATALOG_EMPTY
            };
            return self.line(text);
        }
        for (index, brand) in view.catalog.iter().enumerate() {
            let marker = if has_analysis(brand) { '*' } else { ' ' };
            writeln!(self.out, "{:>3}. {marker} {brand}", index + 1)?;
        }
        self.out.flush()
    }

    /// Writes what changed since the last frame. Returns whether anything
    /// was printed.
    pub fn render(&mut self, view: &AppViewModel) -> io::Result<bool> {
        let last = std::mem::replace(&mut self.last, view.clone());
        let mut lines = Vec::new();

        if view.backend != last.backend {
            lines.push(backend_line(view.backend));
        }

        let loading_changed = view.catalog_loading != last.catalog_loading;
        if loading_changed && view.catalog_loading {
            lines.push(CATALOG_LOADING.to_string());
        }
        if !view.catalog_loading
            && (loading_changed
                || view.catalog.len() != last.catalog.len()
                || view.precomputed_count != last.precomputed_count)
        {
            lines.push(format!(
                "Catalog: {} products, {} with instant analysis",
                view.catalog.len(),
                view.precomputed_count
            ));
        }

        let notification_id = view.notification.as_ref().map(|n| n.id);
        if notification_id != last.notification.as_ref().map(|n| n.id) {
            if let Some(notification) = &view.notification {
                let tag = match notification.kind {
                    NotificationKind::Info => "info",
                    NotificationKind::Success => "ok",
                    NotificationKind::Error => "error",
                };
                lines.push(format!("[{tag}] {}", notification.message));
            }
        }

        if view.resolution != last.resolution {
            if let Some(text) = resolution_line(view.resolution) {
                lines.push(text.to_string());
            }
        }

        if let Some(chat) = &view.chat {
            if self.revealed == Some(chat.session) {
                let new_messages = chat.messages.get(self.shown_messages..).unwrap_or_default();
                for message in new_messages.iter().filter(|m| m.role == Role::Assistant) {
                    lines.push(message_line(message));
                }
                self.shown_messages = chat.messages.len();

                let was_pending = last
                    .chat
                    .as_ref()
                    .is_some_and(|c| c.session == chat.session && c.pending);
                if chat.pending && !was_pending {
                    lines.push("... thinking".to_string());
                }
            }
        }

        for line in &lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(!lines.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.out
    }
}

impl<W: Write> ResultsViewport for TerminalRenderer<W> {
    fn reveal_results(&mut self, view: &AppViewModel) -> io::Result<bool> {
        let (Some(analysis), Some(chat)) = (&view.analysis, &view.chat) else {
            return Ok(false);
        };
        if self.revealed == Some(chat.session) {
            return Ok(false);
        }

        write_analysis(&mut self.out, analysis)?;
        writeln!(
            self.out,
            "--- Questions about {}? Use `ask <question>` ---",
            chat.product_name
        )?;
        for message in &chat.messages {
            writeln!(self.out, "{}", message_line(message))?;
        }
        self.revealed = Some(chat.session);
        self.shown_messages = chat.messages.len();
        self.last = view.clone();
        self.out.flush()?;
        Ok(true)
    }
}

fn backend_line(backend: BackendState) -> String {
    match backend {
        BackendState::Checking => "Checking the analysis service...".to_string(),
        BackendState::Ready => "Analysis service is ready.".to_string(),
        BackendState::Unavailable { attempts } => {
            format!("Analysis service unavailable after {attempts} checks. Catalog products still work.")
        }
    }
}

fn resolution_line(resolution: Resolution) -> Option<&'static str> {
    match resolution {
        Resolution::Searching => Some("... searching"),
        Resolution::AutoAnalyzing | Resolution::Analyzing => Some("... analyzing"),
        Resolution::ManualEntry => Some(MANUAL_HINT),
        Resolution::Idle | Resolution::Resolved => None,
    }
}

fn write_analysis(out: &mut impl Write, analysis: &AnalysisResult) -> io::Result<()> {
    writeln!(out, "=== {} ===", analysis.cereal_name)?;
    if !analysis.ingredients.is_empty() {
        writeln!(out, "Ingredients: {}", analysis.ingredients)?;
    }
    match (&analysis.error, analysis.analysis.is_empty()) {
        (Some(error), true) => writeln!(out, "Error: {error}")?,
        _ => writeln!(out, "{}", analysis.analysis)?,
    }
    Ok(())
}

fn message_line(message: &ChatMessage) -> String {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    format!("{speaker}: {}", message.content)
}
