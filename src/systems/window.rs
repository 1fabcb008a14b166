//! Window management system
//!
//! Handles window creation, fullscreen toggle, and title updates. The title
//! carries the control state the page overlay used to show.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};
use crate::config::WindowConfig;

/// Manages the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            base_title: config.title.clone(),
        })
    }

    /// Get window reference (for RenderContext creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Update window title with the control state
    pub fn update_title(&self, status: &TitleStatus<'_>) {
        self.window.set_title(&format_title(&self.base_title, status));
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

/// What the title bar reports
#[derive(Debug, Clone, Copy)]
pub struct TitleStatus<'a> {
    pub speed: f32,
    pub panel_open: bool,
    pub hovered: Option<&'a str>,
}

/// Title text for `status`
pub fn format_title(base: &str, status: &TitleStatus<'_>) -> String {
    let mut title = format!("{} - Speed {:.1}x", base, status.speed);
    if status.panel_open {
        title.push_str(" [Panel: Up/Down speed, P close]");
    } else {
        title.push_str(" [P for controls]");
    }
    if let Some(name) = status.hovered {
        title.push_str(" - ");
        title.push_str(name);
    }
    title
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_panel_closed() {
        let title = format_title("Test", &TitleStatus { speed: 0.5, panel_open: false, hovered: None });
        assert_eq!(title, "Test - Speed 0.5x [P for controls]");
    }

    #[test]
    fn test_title_panel_open_with_hover() {
        let title = format_title("Test", &TitleStatus { speed: 1.5, panel_open: true, hovered: Some("wormhole") });
        assert!(title.contains("Speed 1.5x"));
        assert!(title.contains("P close"));
        assert!(title.ends_with("- wormhole"));
    }

    #[test]
    fn test_window_error_display() {
        let err = WindowError::CreationFailed("no display".to_string());
        assert_eq!(err.to_string(), "Window creation failed: no display");
    }
}
