mod accumulator;
mod code_fences;
pub mod events;
mod gallery;
mod gallery_view;
mod menu_parser;
pub mod orchestrator;

pub use accumulator::*;
pub use code_fences::*;
pub use gallery::*;
pub use gallery_view::*;
pub use menu_parser::*;
pub use orchestrator::*;
