//! Status line messages shown under the timer.

use ratatui::style::Color;

/// Notification level (determines styling)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Informational message
    Info,
    /// Success message (task created, session closed, etc.)
    Success,
    /// Warning message
    Warning,
    /// Error message
    Error,
}

impl NotificationLevel {
    /// Get color for this level
    pub fn color(&self) -> Color {
        match self {
            NotificationLevel::Info => Color::Blue,
            NotificationLevel::Success => Color::Green,
            NotificationLevel::Warning => Color::Yellow,
            NotificationLevel::Error => Color::Red,
        }
    }

    /// Get icon/prefix for this level
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }
}

/// The single message currently shown on the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: NotificationLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn new(level: NotificationLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, text)
    }

    /// Text with the level icon in front.
    pub fn display(&self) -> String {
        format!("{} {}", self.level.icon(), self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_level() {
        assert_eq!(StatusMessage::info("x").level, NotificationLevel::Info);
        assert_eq!(StatusMessage::success("x").level, NotificationLevel::Success);
        assert_eq!(StatusMessage::warning("x").level, NotificationLevel::Warning);
        assert_eq!(StatusMessage::error("x").level, NotificationLevel::Error);
    }

    #[test]
    fn test_display_prefixes_icon() {
        assert_eq!(StatusMessage::error("boom").display(), "✗ boom");
    }

    #[test]
    fn test_level_colors_differ() {
        assert_ne!(
            NotificationLevel::Warning.color(),
            NotificationLevel::Error.color()
        );
    }
}
