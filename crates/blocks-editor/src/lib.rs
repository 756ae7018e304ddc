//! Paste and drop connection resolution for block programs.
//!
//! Given a pasted fragment, the pointer position, and the block the user
//! interacted with, decide which socket (if any) the fragment plugs into:
//! first by direct hit under the pointer, then through an ordered fallback
//! chain, otherwise leaving it where it was pasted.

pub mod direct_hit;
pub mod fallback;
pub mod host;
pub mod input;
pub mod paste;

pub use direct_hit::{Attached, ReplacePolicy, resolve_direct_hit};
pub use fallback::{FallbackStrategy, resolve_fallback};
pub use host::ProgramGraph;
pub use input::{PointerEvent, PointerSample, PointerTracker};
pub use paste::{Attachment, PasteOutcome, PasteRequest, paste_fragment};
