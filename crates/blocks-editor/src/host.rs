//! The graph seam the resolver works through.
//!
//! Resolution only ever reads sockets and issues `connect` / `disconnect` /
//! `clear_placeholder`. Any document model that can answer these can host
//! the resolver; `BlockGraph` is the in-tree implementation.

use blocks_core::clipboard::ClipboardBlock;
use blocks_core::geometry::GraphPoint;
use blocks_core::id::BlockId;
use blocks_core::model::{BlockGraph, Connector, SlotRef, Socket};

/// Read and mutate access to the program graph around a host block.
///
/// Positions must be current at call time. Mutations are atomic and
/// synchronous.
pub trait ProgramGraph {
    /// Declared sockets of `host`, in layout order.
    fn sockets(&self, host: BlockId) -> Vec<Socket>;

    /// Pseudo-socket for stacking below `host`, if it has one.
    fn next_link(&self, host: BlockId) -> Option<Socket>;

    /// Pseudo-socket for stacking above `host`, if it has one.
    fn previous_link(&self, host: BlockId) -> Option<Socket>;

    /// Connection ends exposed by `block`.
    fn connector(&self, block: BlockId) -> Option<Connector>;

    /// Plug free-floating `block` into an empty `slot`.
    fn connect(&mut self, slot: SlotRef, block: BlockId);

    /// Detach the occupant of `slot`, leaving it free-floating.
    fn disconnect(&mut self, slot: SlotRef) -> Option<BlockId>;

    /// Silently delete a placeholder occupant. Real blocks below it must be
    /// left free-floating, never deleted. False if there was no placeholder.
    fn clear_placeholder(&mut self, slot: SlotRef) -> bool;

    /// Build a clipboard payload as a free-floating fragment at `at`.
    fn materialize(&mut self, payload: &ClipboardBlock, at: GraphPoint) -> BlockId;
}

impl ProgramGraph for BlockGraph {
    fn sockets(&self, host: BlockId) -> Vec<Socket> {
        BlockGraph::sockets(self, host)
    }

    fn next_link(&self, host: BlockId) -> Option<Socket> {
        BlockGraph::next_link(self, host)
    }

    fn previous_link(&self, host: BlockId) -> Option<Socket> {
        BlockGraph::previous_link(self, host)
    }

    fn connector(&self, block: BlockId) -> Option<Connector> {
        self.get_by_id(block).map(|b| b.connector.clone())
    }

    fn connect(&mut self, slot: SlotRef, block: BlockId) {
        BlockGraph::connect(self, slot, block);
    }

    fn disconnect(&mut self, slot: SlotRef) -> Option<BlockId> {
        BlockGraph::disconnect(self, slot)
    }

    fn clear_placeholder(&mut self, slot: SlotRef) -> bool {
        BlockGraph::clear_placeholder(self, slot)
    }

    fn materialize(&mut self, payload: &ClipboardBlock, at: GraphPoint) -> BlockId {
        BlockGraph::materialize(self, payload, at)
    }
}
