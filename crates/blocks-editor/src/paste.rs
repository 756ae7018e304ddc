//! Paste orchestration.
//!
//! The fragment is always materialized first, at the pointer's graph
//! position, so it has a stable identity and a guaranteed resting place.
//! Only then do the direct-hit resolver and the fallback chain try to plug
//! it into the host.

use crate::direct_hit::{ReplacePolicy, resolve_direct_hit};
use crate::fallback::{FallbackStrategy, resolve_fallback};
use crate::host::ProgramGraph;
use crate::input::PointerSample;
use blocks_core::clipboard::ClipboardBlock;
use blocks_core::geometry::{
    GraphPoint, PointerKind, SnapConfig, Viewport, hit_radius, to_graph_space,
};
use blocks_core::id::BlockId;
use blocks_core::model::SlotRef;

/// Everything one paste needs, sampled by the host at event time.
#[derive(Debug, Clone, Copy)]
pub struct PasteRequest<'a> {
    pub payload: &'a ClipboardBlock,
    /// Where the paste was triggered. `None` (e.g. a keyboard shortcut
    /// with the pointer off-canvas) anchors at the viewport centre.
    pub pointer: Option<PointerSample>,
    /// The block the user interacted with, or `None` for empty canvas.
    pub host: Option<BlockId>,
    pub viewport: Viewport,
}

/// How the pasted fragment ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Plugged into the socket under the pointer.
    Direct(SlotRef),
    /// Plugged in by a fallback strategy.
    Fallback(FallbackStrategy, SlotRef),
    /// Left free-floating at the paste position.
    Unattached,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PasteOutcome {
    /// Root of the pasted fragment, for the host to select or focus.
    pub block: BlockId,
    /// Graph position the fragment was first placed at.
    pub pasted_at: GraphPoint,
    pub attachment: Attachment,
    /// Real block pushed out of its socket to make room, if any.
    pub displaced: Option<BlockId>,
}

/// Paste `request.payload` and attach it to the host where possible.
///
/// Emits at most one connect, plus a separate displacement when a real
/// block under the pointer had to make room.
///
/// # Panics
/// If the viewport is malformed, the pointer position is not finite, or the
/// host is given and the fragment exposes no connector.
pub fn paste_fragment<G: ProgramGraph>(
    graph: &mut G,
    request: &PasteRequest<'_>,
    config: &SnapConfig,
) -> PasteOutcome {
    request.viewport.assert_valid();

    let (screen, kind) = match request.pointer {
        Some(sample) => (sample.position, sample.kind),
        None => (request.viewport.center(), PointerKind::default()),
    };
    let pasted_at = to_graph_space(screen, &request.viewport);
    assert!(pasted_at.is_finite(), "pointer position must be finite");
    let block = graph.materialize(request.payload, pasted_at);

    let unattached = PasteOutcome {
        block,
        pasted_at,
        attachment: Attachment::Unattached,
        displaced: None,
    };

    let Some(host) = request.host else {
        log::debug!("pasted {block} onto empty canvas");
        return unattached;
    };

    let radius = hit_radius(kind, request.viewport.zoom_scale, config);
    if let Some(attached) =
        resolve_direct_hit(graph, host, block, pasted_at, radius, ReplacePolicy::Hover)
    {
        return PasteOutcome {
            attachment: Attachment::Direct(attached.slot),
            displaced: attached.displaced,
            ..unattached
        };
    }

    if let Some((strategy, attached)) = resolve_fallback(graph, host, block) {
        return PasteOutcome {
            attachment: Attachment::Fallback(strategy, attached.slot),
            displaced: attached.displaced,
            ..unattached
        };
    }

    log::debug!("nothing on {host} takes {block}; left at paste position");
    unattached
}
