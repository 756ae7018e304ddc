use blocks_core::clipboard::decode_clipboard;
use blocks_core::geometry::{GraphPoint, PointerKind, SnapConfig, Viewport};
use blocks_core::id::BlockId;
use blocks_core::model::{Block, BlockGraph, Connector, ConnectorEnd, InputDef, TagSet};
use blocks_editor::{PasteRequest, PointerSample, paste_fragment};
use std::env;
use std::fs;
use std::process::ExitCode;

const DEFAULT_CLIPBOARD: &str = r#"{
  "type": "move_forward",
  "connector": { "previous": { "tags": [] }, "next": { "tags": [] } },
  "next_offset": { "x": 0.0, "y": 24.0 }
}"#;

fn main() -> ExitCode {
    env_logger::init();

    // Usage: paste_demo [clipboard.json] [screen_x screen_y]
    let args: Vec<String> = env::args().skip(1).collect();
    let text = match args.first() {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("cannot read {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_CLIPBOARD.to_string(),
    };
    let payload = match decode_clipboard(&text) {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let (x, y) = match (args.get(1), args.get(2)) {
        (Some(x), Some(y)) => match (x.parse::<f32>(), y.parse::<f32>()) {
            (Ok(x), Ok(y)) => (x, y),
            _ => {
                eprintln!("pointer coordinates must be numbers");
                return ExitCode::FAILURE;
            }
        },
        _ => (100.0, 100.0),
    };

    let mut graph = BlockGraph::new();
    let host = BlockId::intern("demo_loop");
    graph.add_block(
        Block::new(
            host,
            "controls_repeat",
            Connector {
                previous: Some(ConnectorEnd::any()),
                next: Some(ConnectorEnd::any()),
                ..Connector::default()
            },
        )
        .at(GraphPoint::new(40.0, 40.0))
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
        .with_next_offset(GraphPoint::new(0.0, 72.0)),
    );

    let outcome = paste_fragment(
        &mut graph,
        &PasteRequest {
            payload: &payload,
            pointer: Some(PointerSample::new(x, y, PointerKind::Mouse)),
            host: Some(host),
            viewport: Viewport::default(),
        },
        &SnapConfig::default(),
    );

    println!("pasted {} at ({}, {})", outcome.block, outcome.pasted_at.x, outcome.pasted_at.y);
    println!("attachment: {:?}", outcome.attachment);
    if let Some(displaced) = outcome.displaced {
        println!("displaced: {displaced}");
    }
    for event in graph.take_events() {
        println!("event: {event:?}");
    }
    ExitCode::SUCCESS
}
