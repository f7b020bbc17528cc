//! Pop any element of a document out into a floating, draggable, resizable
//! window, and dock it back where it came from.
//!
//! The crate keeps a small headless document model ([`dom`]) that hosts lay
//! out and feed pointer input into. A [`Popout`] service owns the document
//! and turns bound elements into decorated windows on demand. The
//! [`render`] module paints the result into a ratatui buffer, and the
//! `popout` binary drives it from a terminal.

pub mod config;
pub mod constants;
pub mod dom;
pub mod drag;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod events;
pub mod geometry;
pub mod manager;
pub mod render;
pub mod resize;
pub mod tracing_sub;
pub mod trigger;
pub mod window;
pub mod zorder;

pub use config::PopoutConfig;
pub use error::{DomError, PopoutError};
pub use manager::{DispatchOutcome, Popout};
pub use trigger::BindingId;
pub use window::WindowId;
