//! Fallback chain: non-geometric attachment after a direct-hit miss.
//!
//! Strategies run in a fixed order and the first success wins. None of
//! them displaces a real block. If all fail the fragment stays where it
//! was pasted, which is a valid outcome, not an error.

use crate::direct_hit::{Attached, ReplacePolicy, try_attach};
use crate::host::ProgramGraph;
use blocks_core::compat::is_compatible;
use blocks_core::id::BlockId;
use blocks_core::model::{Connector, ConnectorSide};

/// The non-geometric strategies, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackStrategy {
    /// Hang the fragment below the host.
    StackAppend,
    /// First free statement socket of the host.
    EmptyStatement,
    /// First free value socket of the host.
    EmptyValue,
    /// Put the fragment above the host.
    InsertAbove,
}

impl FallbackStrategy {
    pub const ORDER: [FallbackStrategy; 4] = [
        FallbackStrategy::StackAppend,
        FallbackStrategy::EmptyStatement,
        FallbackStrategy::EmptyValue,
        FallbackStrategy::InsertAbove,
    ];
}

/// Try each strategy in `FallbackStrategy::ORDER` until one attaches
/// `fragment` to `host`.
pub fn resolve_fallback<G: ProgramGraph>(
    graph: &mut G,
    host: BlockId,
    fragment: BlockId,
) -> Option<(FallbackStrategy, Attached)> {
    let connector = graph.connector(fragment)?;
    for strategy in FallbackStrategy::ORDER {
        if let Some(attached) = run_strategy(graph, strategy, host, fragment, &connector) {
            log::debug!("fallback {strategy:?}: {fragment} → {:?}", attached.slot);
            return Some((strategy, attached));
        }
        log::trace!("fallback {strategy:?} found nothing for {fragment}");
    }
    None
}

fn run_strategy<G: ProgramGraph>(
    graph: &mut G,
    strategy: FallbackStrategy,
    host: BlockId,
    fragment: BlockId,
    connector: &Connector,
) -> Option<Attached> {
    match strategy {
        FallbackStrategy::StackAppend => {
            let link = graph.next_link(host)?;
            if !is_compatible(connector, ConnectorSide::Previous, &link) {
                return None;
            }
            try_attach(graph, &link, fragment, ReplacePolicy::None)
        }
        FallbackStrategy::EmptyStatement => {
            first_open_socket(graph, host, fragment, connector, ConnectorSide::Previous)
        }
        FallbackStrategy::EmptyValue => {
            first_open_socket(graph, host, fragment, connector, ConnectorSide::Output)
        }
        FallbackStrategy::InsertAbove => {
            let link = graph.previous_link(host)?;
            if !is_compatible(connector, ConnectorSide::Next, &link) {
                return None;
            }
            try_attach(graph, &link, fragment, ReplacePolicy::None)
        }
    }
}

/// First socket of `host`, in declared order, that takes `side` and is
/// empty or holds only a placeholder.
fn first_open_socket<G: ProgramGraph>(
    graph: &mut G,
    host: BlockId,
    fragment: BlockId,
    connector: &Connector,
    side: ConnectorSide,
) -> Option<Attached> {
    let kind = side.socket_kind();
    graph
        .sockets(host)
        .iter()
        .filter(|s| s.kind == kind && is_compatible(connector, side, s))
        .find_map(|socket| try_attach(graph, socket, fragment, ReplacePolicy::None))
}
