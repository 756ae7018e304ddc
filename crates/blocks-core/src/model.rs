//! Core program-graph model for block documents.
//!
//! A document is a forest of blocks. Edges go from a host block to the block
//! plugged into one of its sockets, labelled with the socket they occupy
//! (`Link::Input(i)` or `Link::Next`). A block without a parent edge is a
//! free-floating top-level block whose `position` is absolute; attached
//! blocks store a position relative to their parent.
//!
//! Sockets belong to exactly one host block. The resolver never sees the
//! declared `InputDef`s directly; it reads `Socket` views, whose graph-space
//! positions are recomputed on every call.

use crate::geometry::GraphPoint;
use crate::id::{BlockId, TypeTag};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Type tags ───────────────────────────────────────────────────────────

/// A small set of type tags. The empty set is a wildcard that matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(SmallVec<[TypeTag; 2]>);

impl TagSet {
    /// The wildcard set.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn of(tags: &[&str]) -> Self {
        let mut set = Self::default();
        for tag in tags {
            set.insert(TypeTag::intern(tag));
        }
        set
    }

    pub fn insert(&mut self, tag: TypeTag) {
        if !self.0.contains(&tag) {
            self.0.push(tag);
        }
    }

    pub fn contains(&self, tag: TypeTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn is_wildcard(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TypeTag> + '_ {
        self.0.iter().copied()
    }

    /// True if the sets share a tag or either one is the wildcard.
    pub fn matches(&self, other: &TagSet) -> bool {
        self.is_wildcard() || other.is_wildcard() || self.iter().any(|t| other.contains(t))
    }
}

// ─── Connectors ──────────────────────────────────────────────────────────

/// What a socket holds: an expression or a statement chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocketKind {
    Value,
    Statement,
}

/// One attachment point on a block, carrying the tags it offers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorEnd {
    #[serde(default)]
    pub tags: TagSet,
}

impl ConnectorEnd {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn of(tags: &[&str]) -> Self {
        Self {
            tags: TagSet::of(tags),
        }
    }
}

/// The connection ends a block exposes. The three ends are independent;
/// nothing here assumes an editor's "no output plus previous" rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    /// Expression-producing tip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ConnectorEnd>,
    /// Statement-chain head.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<ConnectorEnd>,
    /// Statement-chain tail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<ConnectorEnd>,
}

/// Selects one end of a `Connector`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorSide {
    Output,
    Previous,
    Next,
}

impl ConnectorSide {
    /// The socket kind this end can plug into.
    pub fn socket_kind(self) -> SocketKind {
        match self {
            ConnectorSide::Output => SocketKind::Value,
            ConnectorSide::Previous | ConnectorSide::Next => SocketKind::Statement,
        }
    }
}

impl Connector {
    pub fn end(&self, side: ConnectorSide) -> Option<&ConnectorEnd> {
        match side {
            ConnectorSide::Output => self.output.as_ref(),
            ConnectorSide::Previous => self.previous.as_ref(),
            ConnectorSide::Next => self.next.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_none() && self.previous.is_none() && self.next.is_none()
    }
}

// ─── Blocks ──────────────────────────────────────────────────────────────

/// A declared input socket of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDef {
    pub name: String,
    pub kind: SocketKind,
    /// Position relative to the owning block's origin.
    #[serde(default)]
    pub offset: GraphPoint,
    /// Tags this socket accepts. Empty accepts anything.
    #[serde(default)]
    pub accepts: TagSet,
}

impl InputDef {
    pub fn value(name: &str, offset: GraphPoint, accepts: TagSet) -> Self {
        Self {
            name: name.to_string(),
            kind: SocketKind::Value,
            offset,
            accepts,
        }
    }

    pub fn statement(name: &str, offset: GraphPoint, accepts: TagSet) -> Self {
        Self {
            name: name.to_string(),
            kind: SocketKind::Statement,
            offset,
            accepts,
        }
    }
}

/// A single block in the program graph.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: BlockId,
    /// Block definition name, e.g. `controls_repeat` or `math_number`.
    pub block_type: String,
    /// Absolute when top-level, relative to the parent otherwise.
    pub position: GraphPoint,
    pub connector: Connector,
    /// Declared sockets in layout order.
    pub inputs: SmallVec<[InputDef; 4]>,
    /// Where the next-link pseudo-socket sits, relative to the origin.
    pub next_offset: GraphPoint,
    /// Shadow filler the user never authored; silently replaceable.
    pub placeholder: bool,
}

impl Block {
    pub fn new(id: BlockId, block_type: &str, connector: Connector) -> Self {
        Self {
            id,
            block_type: block_type.to_string(),
            position: GraphPoint::ORIGIN,
            connector,
            inputs: SmallVec::new(),
            next_offset: GraphPoint::ORIGIN,
            placeholder: false,
        }
    }

    pub fn at(mut self, position: GraphPoint) -> Self {
        self.position = position;
        self
    }

    pub fn with_input(mut self, input: InputDef) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_next_offset(mut self, offset: GraphPoint) -> Self {
        self.next_offset = offset;
        self
    }

    pub fn as_placeholder(mut self) -> Self {
        self.placeholder = true;
        self
    }
}

/// Which socket of the parent an edge occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Link {
    Input(usize),
    Next,
}

// ─── Socket views ────────────────────────────────────────────────────────

/// Identity of a socket or pseudo-socket on a host block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotRef {
    /// The host's declared input at `index`.
    Input { host: BlockId, index: usize },
    /// Stack continuation below the host.
    NextLink(BlockId),
    /// Stack continuation above the host.
    PreviousLink(BlockId),
}

impl SlotRef {
    pub fn host(&self) -> BlockId {
        match *self {
            SlotRef::Input { host, .. } | SlotRef::NextLink(host) | SlotRef::PreviousLink(host) => {
                host
            }
        }
    }
}

/// How an occupant may be cleared out of its socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Removable {
    /// Shadow filler: removed without any notification.
    Placeholder,
    /// User-authored block: only ever displaced, never deleted.
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub block: BlockId,
    pub removable: Removable,
}

/// Read-only view of a socket as the resolver sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Socket {
    pub slot: SlotRef,
    pub kind: SocketKind,
    /// Absolute graph-space position at the time of the read.
    pub position: GraphPoint,
    pub accepts: TagSet,
    pub occupant: Option<Occupant>,
}

/// A structural change observable by the host (e.g. for its undo log).
#[derive(Debug, Clone, PartialEq)]
pub enum StructureEvent {
    /// `block` was plugged into `slot`.
    Connected { slot: SlotRef, block: BlockId },
    /// A real occupant was pulled out of `slot` and left free-floating at `at`.
    Displaced {
        slot: SlotRef,
        block: BlockId,
        at: GraphPoint,
    },
}

// ─── Block Graph ─────────────────────────────────────────────────────────

/// The program graph: a forest of blocks stored in a petgraph `StableDiGraph`.
#[derive(Debug, Clone)]
pub struct BlockGraph {
    pub graph: StableDiGraph<Block, Link>,

    /// Index from BlockId → NodeIndex for fast lookup.
    pub id_index: HashMap<BlockId, NodeIndex>,

    /// Structural events not yet drained by the host.
    events: Vec<StructureEvent>,
}

impl BlockGraph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            id_index: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Add a free-floating top-level block.
    ///
    /// # Panics
    /// If a block with the same id already exists.
    pub fn add_block(&mut self, block: Block) -> NodeIndex {
        let id = block.id;
        assert!(!self.id_index.contains_key(&id), "duplicate block id {id}");
        let idx = self.graph.add_node(block);
        self.id_index.insert(id, idx);
        idx
    }

    /// Add `block` already plugged into `link` of `parent`.
    ///
    /// Used when loading a document; emits no structural event.
    ///
    /// # Panics
    /// If the parent is unknown, lacks the socket, or the socket is occupied.
    pub fn add_child(&mut self, parent: BlockId, link: Link, block: Block) -> NodeIndex {
        let parent_idx = self.expect_index(parent);
        let child = self.add_block(block);
        self.link(parent_idx, link, child);
        child
    }

    pub fn get_by_id(&self, id: BlockId) -> Option<&Block> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn get_by_id_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn index_of(&self, id: BlockId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// The parent of a block and the socket it occupies there.
    pub fn parent(&self, idx: NodeIndex) -> Option<(NodeIndex, Link)> {
        let parent = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()?;
        let edge = self.graph.find_edge(parent, idx)?;
        Some((parent, self.graph[edge]))
    }

    /// The block plugged into `link` of `idx`, if any.
    pub fn child_at(&self, idx: NodeIndex, link: Link) -> Option<NodeIndex> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .find(|e| *e.weight() == link)
            .map(|e| e.target())
    }

    pub fn is_top_level(&self, id: BlockId) -> bool {
        self.index_of(id).is_some_and(|idx| self.parent(idx).is_none())
    }

    /// Top-level blocks in insertion order.
    pub fn top_blocks(&self) -> Vec<BlockId> {
        let mut roots: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| self.parent(*idx).is_none())
            .collect();
        roots.sort();
        roots.into_iter().map(|idx| self.graph[idx].id).collect()
    }

    /// Graph-space position of a block, summing relative offsets up the tree.
    pub fn absolute_position(&self, idx: NodeIndex) -> GraphPoint {
        let mut pos = self.graph[idx].position;
        let mut current = idx;
        while let Some((parent, _)) = self.parent(current) {
            pos = pos + self.graph[parent].position;
            current = parent;
        }
        pos
    }

    /// Whether `candidate` is `root` or one of its descendants.
    pub fn is_in_subtree(&self, root: NodeIndex, candidate: NodeIndex) -> bool {
        let mut current = candidate;
        loop {
            if current == root {
                return true;
            }
            match self.parent(current) {
                Some((parent, _)) => current = parent,
                None => return false,
            }
        }
    }

    // ─── Socket enumeration ──────────────────────────────────────────────

    /// Resolve a slot into a socket view. `None` if the host is unknown or
    /// does not have that socket.
    pub fn socket(&self, slot: SlotRef) -> Option<Socket> {
        let host_idx = self.index_of(slot.host())?;
        let host = &self.graph[host_idx];
        let origin = self.absolute_position(host_idx);
        match slot {
            SlotRef::Input { index, .. } => {
                let input = host.inputs.get(index)?;
                Some(Socket {
                    slot,
                    kind: input.kind,
                    position: origin + input.offset,
                    accepts: input.accepts.clone(),
                    occupant: self.occupant_at(host_idx, Link::Input(index)),
                })
            }
            SlotRef::NextLink(_) => {
                let end = host.connector.next.as_ref()?;
                Some(Socket {
                    slot,
                    kind: SocketKind::Statement,
                    position: origin + host.next_offset,
                    accepts: end.tags.clone(),
                    occupant: self.occupant_at(host_idx, Link::Next),
                })
            }
            SlotRef::PreviousLink(_) => {
                let end = host.connector.previous.as_ref()?;
                // Whatever the host hangs from is structure, never filler.
                let occupant = self.parent(host_idx).map(|(parent, _)| Occupant {
                    block: self.graph[parent].id,
                    removable: Removable::Real,
                });
                Some(Socket {
                    slot,
                    kind: SocketKind::Statement,
                    position: origin,
                    accepts: end.tags.clone(),
                    occupant,
                })
            }
        }
    }

    /// Declared sockets of `host` in layout order.
    pub fn sockets(&self, host: BlockId) -> Vec<Socket> {
        let Some(block) = self.get_by_id(host) else {
            return Vec::new();
        };
        (0..block.inputs.len())
            .filter_map(|index| self.socket(SlotRef::Input { host, index }))
            .collect()
    }

    pub fn next_link(&self, host: BlockId) -> Option<Socket> {
        self.socket(SlotRef::NextLink(host))
    }

    pub fn previous_link(&self, host: BlockId) -> Option<Socket> {
        self.socket(SlotRef::PreviousLink(host))
    }

    fn occupant_at(&self, idx: NodeIndex, link: Link) -> Option<Occupant> {
        let child = &self.graph[self.child_at(idx, link)?];
        Some(Occupant {
            block: child.id,
            removable: if child.placeholder {
                Removable::Placeholder
            } else {
                Removable::Real
            },
        })
    }

    // ─── Mutation primitives ─────────────────────────────────────────────

    /// Plug a free-floating `block` into `slot`. Atomic: on return the block
    /// is fully re-parented and its position is relative to its new parent.
    ///
    /// For `PreviousLink` the block is placed above the host: it takes the
    /// host's absolute position and the host hangs from its next link.
    ///
    /// # Panics
    /// If the slot is occupied or missing, or `block` is attached or would
    /// end up inside its own subtree.
    pub fn connect(&mut self, slot: SlotRef, block: BlockId) {
        let child = self.expect_index(block);
        assert!(
            self.parent(child).is_none(),
            "{block} must be free-floating before it is connected"
        );
        match slot {
            SlotRef::Input { host, index } => {
                let parent = self.expect_index(host);
                assert!(
                    !self.is_in_subtree(child, parent),
                    "cannot connect {block} into its own subtree"
                );
                self.link(parent, Link::Input(index), child);
            }
            SlotRef::NextLink(host) => {
                let parent = self.expect_index(host);
                assert!(
                    !self.is_in_subtree(child, parent),
                    "cannot connect {block} into its own subtree"
                );
                assert!(
                    self.graph[parent].connector.next.is_some(),
                    "{host} has no next link"
                );
                self.link(parent, Link::Next, child);
            }
            SlotRef::PreviousLink(host) => {
                let below = self.expect_index(host);
                assert!(below != child, "cannot connect {block} above itself");
                assert!(
                    self.parent(below).is_none(),
                    "previous link of {host} is occupied"
                );
                assert!(
                    self.graph[child].connector.next.is_some(),
                    "{block} has no next end to hold {host}"
                );
                let host_pos = self.graph[below].position;
                let tail = self.graph[child].next_offset;
                self.graph[child].position = host_pos - tail;
                self.link(child, Link::Next, below);
            }
        }
        log::debug!("connected {block} at {slot:?}");
        self.events.push(StructureEvent::Connected { slot, block });
    }

    /// Pull the occupant out of `slot`, leaving it as a free-floating
    /// top-level block at its current absolute position. Returns the block
    /// that was detached, or `None` if the slot was empty.
    ///
    /// For `PreviousLink` the host itself is the block that comes loose.
    pub fn disconnect(&mut self, slot: SlotRef) -> Option<BlockId> {
        let (parent, child) = match slot {
            SlotRef::Input { host, index } => {
                let parent = self.index_of(host)?;
                (parent, self.child_at(parent, Link::Input(index))?)
            }
            SlotRef::NextLink(host) => {
                let parent = self.index_of(host)?;
                (parent, self.child_at(parent, Link::Next)?)
            }
            SlotRef::PreviousLink(host) => {
                let below = self.index_of(host)?;
                (self.parent(below)?.0, below)
            }
        };
        let at = self.absolute_position(child);
        let edge = self.graph.find_edge(parent, child)?;
        self.graph.remove_edge(edge);
        self.graph[child].position = at;
        let block = self.graph[child].id;
        log::debug!("displaced {block} from {slot:?} to ({}, {})", at.x, at.y);
        self.events.push(StructureEvent::Displaced { slot, block, at });
        Some(block)
    }

    /// Delete a placeholder occupant (and the placeholders below it) from
    /// `slot` without emitting any event for them. Real blocks found below
    /// the placeholder become free-floating and are recorded as `Displaced`.
    /// Returns false, touching nothing, if the slot is empty or holds a real
    /// block.
    pub fn clear_placeholder(&mut self, slot: SlotRef) -> bool {
        let Some(occupant) = self.socket(slot).and_then(|s| s.occupant) else {
            return false;
        };
        if occupant.removable != Removable::Placeholder {
            return false;
        }
        let Some(idx) = self.index_of(occupant.block) else {
            return false;
        };
        self.remove_subtree(idx);
        true
    }

    /// Events recorded since the last `take_events`.
    pub fn events(&self) -> &[StructureEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<StructureEvent> {
        std::mem::take(&mut self.events)
    }

    fn link(&mut self, parent: NodeIndex, link: Link, child: NodeIndex) {
        let offset = match link {
            Link::Input(index) => {
                let Some(input) = self.graph[parent].inputs.get(index) else {
                    panic!("{} has no input {index}", self.graph[parent].id);
                };
                input.offset
            }
            Link::Next => self.graph[parent].next_offset,
        };
        assert!(
            self.child_at(parent, link).is_none(),
            "{:?} of {} is occupied",
            link,
            self.graph[parent].id
        );
        self.graph.add_edge(parent, child, link);
        self.graph[child].position = offset;
    }

    /// Delete the placeholder at `idx` and every placeholder below it. Real
    /// blocks hanging anywhere inside are detached first and recorded as
    /// displaced; only placeholders are ever deleted.
    fn remove_subtree(&mut self, idx: NodeIndex) {
        let mut doomed = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            let children: Vec<(NodeIndex, Link)> = self
                .graph
                .edges_directed(current, Direction::Outgoing)
                .map(|e| (e.target(), *e.weight()))
                .collect();
            for (child, link) in children {
                if self.graph[child].placeholder {
                    stack.push(child);
                    continue;
                }
                let host = self.graph[current].id;
                let slot = match link {
                    Link::Input(index) => SlotRef::Input { host, index },
                    Link::Next => SlotRef::NextLink(host),
                };
                self.disconnect(slot);
            }
            doomed.push(current);
        }
        for current in doomed {
            if let Some(removed) = self.graph.remove_node(current) {
                self.id_index.remove(&removed.id);
            }
        }
    }

    fn expect_index(&self, id: BlockId) -> NodeIndex {
        match self.index_of(id) {
            Some(idx) => idx,
            None => panic!("unknown block {id}"),
        }
    }
}

impl Default for BlockGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn statement_block(id: &str) -> Block {
        Block::new(
            BlockId::intern(id),
            "controls_repeat",
            Connector {
                previous: Some(ConnectorEnd::any()),
                next: Some(ConnectorEnd::any()),
                ..Connector::default()
            },
        )
        .with_input(InputDef::value(
            "TIMES",
            GraphPoint::new(60.0, 0.0),
            TagSet::of(&["Number"]),
        ))
        .with_input(InputDef::statement(
            "DO",
            GraphPoint::new(16.0, 24.0),
            TagSet::any(),
        ))
        .with_next_offset(GraphPoint::new(0.0, 60.0))
    }

    fn number_block(id: &str) -> Block {
        Block::new(
            BlockId::intern(id),
            "math_number",
            Connector {
                output: Some(ConnectorEnd::of(&["Number"])),
                ..Connector::default()
            },
        )
    }

    #[test]
    fn tag_sets_match_on_overlap_or_wildcard() {
        let number = TagSet::of(&["Number"]);
        let colour = TagSet::of(&["Colour"]);
        assert!(number.matches(&TagSet::of(&["String", "Number"])));
        assert!(!number.matches(&colour));
        assert!(number.matches(&TagSet::any()));
        assert!(TagSet::any().matches(&colour));
    }

    #[test]
    fn sockets_report_absolute_positions() {
        let mut graph = BlockGraph::new();
        graph.add_block(statement_block("model_loop").at(GraphPoint::new(100.0, 50.0)));

        let sockets = graph.sockets(BlockId::intern("model_loop"));
        assert_eq!(sockets.len(), 2);
        assert_eq!(sockets[0].position, GraphPoint::new(160.0, 50.0));
        assert_eq!(sockets[0].kind, SocketKind::Value);
        assert_eq!(sockets[1].position, GraphPoint::new(116.0, 74.0));
        assert_eq!(
            graph.next_link(BlockId::intern("model_loop")).map(|s| s.position),
            Some(GraphPoint::new(100.0, 110.0))
        );
    }

    #[test]
    fn nested_positions_follow_the_parent() {
        let mut graph = BlockGraph::new();
        let outer = BlockId::intern("model_outer");
        graph.add_block(statement_block("model_outer").at(GraphPoint::new(10.0, 10.0)));
        graph.add_child(outer, Link::Input(1), statement_block("model_inner"));

        let inner = graph.index_of(BlockId::intern("model_inner")).unwrap();
        assert_eq!(graph.absolute_position(inner), GraphPoint::new(26.0, 34.0));
        let inner_socket = &graph.sockets(BlockId::intern("model_inner"))[0];
        assert_eq!(inner_socket.position, GraphPoint::new(86.0, 34.0));
    }

    #[test]
    fn connect_reparents_and_records_event() {
        let mut graph = BlockGraph::new();
        let host = BlockId::intern("model_host");
        let num = BlockId::intern("model_num");
        graph.add_block(statement_block("model_host"));
        graph.add_block(number_block("model_num").at(GraphPoint::new(300.0, 300.0)));

        let slot = SlotRef::Input { host, index: 0 };
        graph.connect(slot, num);

        assert!(!graph.is_top_level(num));
        assert_eq!(graph.get_by_id(num).unwrap().position, GraphPoint::new(60.0, 0.0));
        let occupant = graph.socket(slot).unwrap().occupant.unwrap();
        assert_eq!(occupant.block, num);
        assert_eq!(occupant.removable, Removable::Real);
        assert_eq!(
            graph.take_events(),
            vec![StructureEvent::Connected { slot, block: num }]
        );
        assert!(graph.events().is_empty());
    }

    #[test]
    fn disconnect_leaves_a_free_floating_block() {
        let mut graph = BlockGraph::new();
        let host = BlockId::intern("model_dc_host");
        graph.add_block(statement_block("model_dc_host").at(GraphPoint::new(5.0, 5.0)));
        graph.add_child(host, Link::Input(0), number_block("model_dc_num"));

        let slot = SlotRef::Input { host, index: 0 };
        let displaced = graph.disconnect(slot);
        let num = BlockId::intern("model_dc_num");

        assert_eq!(displaced, Some(num));
        assert!(graph.is_top_level(num));
        assert_eq!(graph.get_by_id(num).unwrap().position, GraphPoint::new(65.0, 5.0));
        assert_eq!(
            graph.take_events(),
            vec![StructureEvent::Displaced {
                slot,
                block: num,
                at: GraphPoint::new(65.0, 5.0),
            }]
        );
        assert_eq!(graph.disconnect(slot), None);
    }

    #[test]
    fn clearing_a_placeholder_is_silent() {
        let mut graph = BlockGraph::new();
        let host = BlockId::intern("model_ph_host");
        graph.add_block(statement_block("model_ph_host"));
        graph.add_child(host, Link::Input(0), number_block("model_ph_shadow").as_placeholder());

        let slot = SlotRef::Input { host, index: 0 };
        assert_eq!(
            graph.socket(slot).unwrap().occupant.map(|o| o.removable),
            Some(Removable::Placeholder)
        );
        assert!(graph.clear_placeholder(slot));
        assert!(!graph.contains(BlockId::intern("model_ph_shadow")));
        assert_eq!(graph.socket(slot).unwrap().occupant, None);
        assert!(graph.events().is_empty());
    }

    #[test]
    fn clearing_a_placeholder_keeps_real_blocks_below_it() {
        let mut graph = BlockGraph::new();
        let host = BlockId::intern("model_chain_host");
        let shadow = BlockId::intern("model_chain_shadow");
        let user = BlockId::intern("model_chain_user");
        graph.add_block(statement_block("model_chain_host").at(GraphPoint::new(10.0, 10.0)));
        graph.add_child(
            host,
            Link::Input(1),
            statement_block("model_chain_shadow").as_placeholder(),
        );
        graph.add_child(
            shadow,
            Link::Input(0),
            number_block("model_chain_shadow_num").as_placeholder(),
        );
        graph.add_child(shadow, Link::Next, statement_block("model_chain_user"));

        assert!(graph.clear_placeholder(SlotRef::Input { host, index: 1 }));

        assert!(!graph.contains(shadow));
        assert!(!graph.contains(BlockId::intern("model_chain_shadow_num")));
        assert!(graph.contains(user));
        assert!(graph.is_top_level(user));
        // host (10, 10) + DO (16, 24) + shadow's next offset (0, 60)
        let at = GraphPoint::new(26.0, 94.0);
        assert_eq!(graph.get_by_id(user).unwrap().position, at);
        assert_eq!(
            graph.take_events(),
            vec![StructureEvent::Displaced {
                slot: SlotRef::NextLink(shadow),
                block: user,
                at,
            }]
        );
    }

    #[test]
    fn clearing_refuses_real_occupants() {
        let mut graph = BlockGraph::new();
        let host = BlockId::intern("model_real_host");
        graph.add_block(statement_block("model_real_host"));
        graph.add_child(host, Link::Input(0), number_block("model_real_num"));

        assert!(!graph.clear_placeholder(SlotRef::Input { host, index: 0 }));
        assert!(graph.contains(BlockId::intern("model_real_num")));
    }

    #[test]
    fn connecting_above_moves_the_host_under_the_block() {
        let mut graph = BlockGraph::new();
        let host = BlockId::intern("model_below");
        let above = BlockId::intern("model_above");
        graph.add_block(statement_block("model_below").at(GraphPoint::new(200.0, 200.0)));
        graph.add_block(statement_block("model_above").at(GraphPoint::new(0.0, 0.0)));

        graph.connect(SlotRef::PreviousLink(host), above);

        assert!(graph.is_top_level(above));
        assert!(!graph.is_top_level(host));
        assert_eq!(graph.get_by_id(above).unwrap().position, GraphPoint::new(200.0, 140.0));
        let host_idx = graph.index_of(host).unwrap();
        assert_eq!(graph.absolute_position(host_idx), GraphPoint::new(200.0, 200.0));
        assert_eq!(
            graph.previous_link(host).and_then(|s| s.occupant).map(|o| o.block),
            Some(above)
        );
    }

    #[test]
    fn blocks_without_ends_have_no_pseudo_sockets() {
        let mut graph = BlockGraph::new();
        graph.add_block(number_block("model_value_only"));
        let id = BlockId::intern("model_value_only");
        assert_eq!(graph.next_link(id), None);
        assert_eq!(graph.previous_link(id), None);
        assert!(graph.sockets(id).is_empty());
    }

    #[test]
    #[should_panic(expected = "is occupied")]
    fn connecting_into_an_occupied_slot_fails_fast() {
        let mut graph = BlockGraph::new();
        let host = BlockId::intern("model_busy_host");
        graph.add_block(statement_block("model_busy_host"));
        graph.add_child(host, Link::Input(0), number_block("model_busy_a"));
        graph.add_block(number_block("model_busy_b"));
        graph.connect(SlotRef::Input { host, index: 0 }, BlockId::intern("model_busy_b"));
    }
}
