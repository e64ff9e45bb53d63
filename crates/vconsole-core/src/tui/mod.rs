//! Terminal User Interface for the console.
//!
//! Two tabs (proof templates and verifier users) over the pages in
//! [`crate::pages`]. Backend requests run on worker threads; their replies
//! are applied on the UI thread in arrival order.

mod app;
mod event;
mod input;
mod navigable;
mod render;
pub(crate) mod state;
pub(crate) mod style;
mod widgets;

pub use app::App;
pub use state::{AppState, Tab};
