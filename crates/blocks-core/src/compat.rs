//! Connector ↔ socket compatibility.

use crate::model::{Connector, ConnectorSide, Socket};

/// Whether the `side` end of `connector` may legally plug into `socket`.
///
/// Kinds must agree (outputs go into value sockets, previous/next ends into
/// statement sockets) and the tag sets must overlap unless either is the
/// wildcard. A missing end is simply incompatible. Never panics.
pub fn is_compatible(connector: &Connector, side: ConnectorSide, socket: &Socket) -> bool {
    let Some(end) = connector.end(side) else {
        return false;
    };
    side.socket_kind() == socket.kind && end.tags.matches(&socket.accepts)
}
