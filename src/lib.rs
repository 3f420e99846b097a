#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod layout;
pub mod layout_dump;
pub mod node;
pub mod parser;
pub mod render;
pub mod style;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::load_config;
pub use layout::{apply_layout, child_connection_point, parent_connection_point};
pub use parser::parse_outline;
pub use render::render_svg;
pub use style::StyleResolver;
pub use theme::Theme;
