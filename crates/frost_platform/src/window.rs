use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Smallest size the user may shrink the window to. Zero disables the
    /// constraint.
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Frostlight".to_string(),
            width: 900,
            height: 600,
            min_width: 320,
            min_height: 240,
        }
    }
}

pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    let mut attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
    if config.min_width > 0 && config.min_height > 0 {
        attrs = attrs.with_min_inner_size(winit::dpi::LogicalSize::new(
            config.min_width,
            config.min_height,
        ));
    }

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    log::debug!("Window created with title '{}'", config.title);
    Arc::new(window)
}
