//! HTML rendering
//!
//! [`Renderer::render`] turns an ordered sequence of posts into a single
//! document; the other `render_*` methods build the board's pages.

pub mod markup;
pub mod renderer;
pub mod template;

pub use markup::{escape, format_content, Markup};
pub use renderer::{board_content, Renderer};
pub use template::{
    EmbeddedTemplate, Slot, Template, TemplateBindingError, TemplateContext, TemplateRegistry,
    BUILTIN_TEMPLATES,
};
