//! Template registry and render dispatcher for moxydoc.
//!
//! A [`TemplateRegistry`] holds handlebars templates keyed by name together
//! with the text helpers they use. [`Renderer`] chooses a template per
//! compound kind and renders a compound against a filtered view of the tree.

mod dispatch;
mod error;
mod helpers;
mod registry;
mod view;

pub use dispatch::{collapse_blank_lines, select_template, Dispatch, Renderer, TemplateKind};
pub use error::RenderError;
pub use helpers::{
    anchor, escape_cell, escape_title, slug, strip_access_modifiers, strip_markdown, AnchorStyle,
    RenderSettings,
};
pub use registry::TemplateRegistry;
pub use view::{summarize, ChildView, CompoundView, MemberView};
