mod action;
mod backend;
mod completion;
mod errors;
mod event;
mod loading;
mod machine_state;
mod menu_image;
mod menu_item;
mod snapshot;
mod textarea;

pub use action::*;
pub use backend::*;
pub use completion::*;
pub use errors::*;
pub use event::*;
pub use loading::*;
pub use machine_state::*;
pub use menu_image::*;
pub use menu_item::*;
pub use snapshot::*;
pub use textarea::*;
