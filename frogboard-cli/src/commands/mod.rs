mod render;
mod serve;
mod templates;

pub use render::{run_render, RenderArgs};
pub use serve::{run_serve, ServeArgs};
pub use templates::{run_templates, TemplatesArgs};
