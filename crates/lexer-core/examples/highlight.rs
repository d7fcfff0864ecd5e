//! Print the spans and fold levels of a file.
//!
//! ```text
//! cargo run -p lexer-core --example highlight -- dialect.yaml input.txt
//! ```

use lexer_core::{Document, LexState, Lexer, PROP_FOLD, PropertySet};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(dialect), Some(input)) = (args.next(), args.next()) else {
        eprintln!("usage: highlight <dialect.yaml> <input>");
        std::process::exit(2);
    };

    let lexer = Arc::new(Lexer::from_path(&dialect)?);
    let text = std::fs::read_to_string(&input)?;
    let mut doc = Document::new(lexer, &text).with_properties(PropertySet::new().with(PROP_FOLD, "1"));
    doc.restyle_all()?;

    for span in doc.spans() {
        if span.state == LexState::Default {
            continue;
        }
        let class = span
            .keyword_class
            .map(|c| format!(" class {c}"))
            .unwrap_or_default();
        println!(
            "{:>6}..{:<6} {:?}{} {:?}",
            span.start,
            span.end,
            span.state,
            class,
            String::from_utf8_lossy(&text.as_bytes()[span.start..span.end])
        );
    }

    println!();
    for (line, level) in doc.levels().iter().enumerate() {
        let marker = if level.is_header() { '+' } else { ' ' };
        println!("{line:>5} {marker} {}", level.depth());
    }
    Ok(())
}
