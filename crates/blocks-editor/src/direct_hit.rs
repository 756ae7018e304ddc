//! Direct-hit resolution: plug the fragment into the host socket the
//! pointer landed on.
//!
//! Sockets are scanned in the host's declared order and the first one that
//! is in range, compatible, and clearable wins. Order is authoritative; the
//! nearest socket does not win ties. Value sockets are tried for fragments
//! with an output, statement sockets otherwise, never both.

use crate::host::ProgramGraph;
use blocks_core::compat::is_compatible;
use blocks_core::geometry::GraphPoint;
use blocks_core::id::BlockId;
use blocks_core::model::{ConnectorSide, Removable, SlotRef, Socket};
use std::collections::HashSet;

/// Whether a real occupant may be pushed out to make room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacePolicy {
    /// The user aimed at this socket: displace whatever is there.
    Hover,
    /// Only empty sockets or placeholders qualify.
    None,
}

/// What was cleared out of a socket before connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vacated {
    AlreadyEmpty,
    /// A placeholder was deleted without notification.
    Placeholder,
    /// A real block was detached and left free-floating.
    Displaced(BlockId),
}

/// A successful attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attached {
    pub slot: SlotRef,
    pub displaced: Option<BlockId>,
}

/// Empty `socket` so the fragment can take its place.
///
/// Either the socket ends up fully vacant (`Some`), or nothing was touched
/// (`None`) and the caller must not connect.
pub fn clear_input_for_paste<G: ProgramGraph>(
    graph: &mut G,
    socket: &Socket,
    policy: ReplacePolicy,
) -> Option<Vacated> {
    let Some(occupant) = socket.occupant else {
        return Some(Vacated::AlreadyEmpty);
    };
    match (occupant.removable, policy) {
        (Removable::Placeholder, _) => graph
            .clear_placeholder(socket.slot)
            .then_some(Vacated::Placeholder),
        (Removable::Real, ReplacePolicy::Hover) => {
            graph.disconnect(socket.slot).map(Vacated::Displaced)
        }
        (Removable::Real, ReplacePolicy::None) => None,
    }
}

/// Clear `socket` under `policy` and connect `fragment` there.
pub fn try_attach<G: ProgramGraph>(
    graph: &mut G,
    socket: &Socket,
    fragment: BlockId,
    policy: ReplacePolicy,
) -> Option<Attached> {
    let vacated = clear_input_for_paste(graph, socket, policy)?;
    graph.connect(socket.slot, fragment);
    Some(Attached {
        slot: socket.slot,
        displaced: match vacated {
            Vacated::Displaced(block) => Some(block),
            Vacated::AlreadyEmpty | Vacated::Placeholder => None,
        },
    })
}

/// Attach `fragment` to the first socket of `host` within `radius` of
/// `pointer` that is compatible and clearable under `policy`.
///
/// A socket that is in range and compatible but whose occupant may not be
/// replaced is skipped; scanning continues with the next one.
///
/// # Panics
/// If `fragment` is unknown or exposes no connector at all, if it is the
/// host itself, if `pointer` is not finite, or if the host reports the same
/// socket twice.
pub fn resolve_direct_hit<G: ProgramGraph>(
    graph: &mut G,
    host: BlockId,
    fragment: BlockId,
    pointer: GraphPoint,
    radius: f32,
    policy: ReplacePolicy,
) -> Option<Attached> {
    assert_ne!(host, fragment, "a fragment cannot be pasted onto itself");
    assert!(pointer.is_finite(), "pointer position must be finite");
    let Some(connector) = graph.connector(fragment) else {
        panic!("unknown fragment {fragment}");
    };
    assert!(!connector.is_empty(), "fragment {fragment} exposes no connector");

    let side = if connector.output.is_some() {
        ConnectorSide::Output
    } else if connector.previous.is_some() {
        ConnectorSide::Previous
    } else {
        return None;
    };
    let kind = side.socket_kind();

    let sockets = graph.sockets(host);
    assert_distinct_slots(&sockets);

    let radius_sq = radius * radius;
    for socket in sockets.iter().filter(|s| s.kind == kind) {
        let distance_sq = socket.position.distance_sq(pointer);
        let in_range = distance_sq <= radius_sq;
        if !in_range {
            log::trace!("{:?} out of range ({distance_sq} > {radius_sq})", socket.slot);
            continue;
        }
        if !is_compatible(&connector, side, socket) {
            log::trace!("{:?} rejects {fragment}", socket.slot);
            continue;
        }
        if let Some(attached) = try_attach(graph, socket, fragment, policy) {
            log::debug!("direct hit: {fragment} → {:?}", attached.slot);
            return Some(attached);
        }
        log::trace!("{:?} occupied under {policy:?}, trying next", socket.slot);
    }
    None
}

fn assert_distinct_slots(sockets: &[Socket]) {
    let mut seen = HashSet::with_capacity(sockets.len());
    for socket in sockets {
        assert!(
            seen.insert(socket.slot),
            "host reported {:?} more than once",
            socket.slot
        );
    }
}
