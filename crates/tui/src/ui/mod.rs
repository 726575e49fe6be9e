//! Terminal rendering: the runtime loop, the root view, the components it
//! hosts, and the theme they draw with.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
pub mod utils;
