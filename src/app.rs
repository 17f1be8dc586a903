//! Application state: the playback controller, the card views and the `App`
//! that ties them to sections and input focus.

mod controller;
mod model;
mod views;

pub use controller::*;
pub use model::*;
pub use views::*;
