//! UI layer for desktop GUI: app shell, panels, and theme.

pub mod app;
pub mod panels;
pub mod theme;

pub use app::DesktopGuiApp;
