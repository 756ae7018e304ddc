pub mod clipboard;
pub mod compat;
pub mod geometry;
pub mod id;
pub mod model;

pub use clipboard::{ClipboardBlock, ClipboardChild, decode_clipboard, encode_clipboard};
pub use compat::is_compatible;
pub use geometry::{
    GraphPoint, PointerKind, ScreenPoint, SnapConfig, Viewport, hit_radius, to_graph_space,
    to_screen_space,
};
pub use id::{BlockId, TypeTag};
pub use model::*;
