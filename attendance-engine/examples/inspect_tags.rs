//! Standalone tag inspector
//!
//! Prints every attendance tag found in the given comment texts, with the
//! date each one resolves to and the names it applies to.
//!
//! Usage:
//!   inspect_tags "<comment text>" ["<comment text>" ...] [--year <year>]
//!
//! Example:
//!   inspect_tags "5.2 @참석 철수, 영희. 5.3 @취소 본인." --year 2023

use attendance_engine::{Analyzer, EngineConfig, TagDate};
use std::env;

fn main() {
    env_logger::init();

    let mut texts = Vec::new();
    let mut year = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--year" {
            year = args.next().and_then(|y| y.parse::<i32>().ok());
        } else {
            texts.push(arg);
        }
    }

    if texts.is_empty() {
        eprintln!("Usage: inspect_tags \"<comment text>\" [...] [--year <year>]");
        std::process::exit(1);
    }

    let mut config = EngineConfig::new();
    config.reference_year = year;
    let analyzer = match Analyzer::new(config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    for (i, text) in texts.iter().enumerate() {
        println!("\n=== Comment {} ===", i + 1);
        println!("{}", text);

        let tags = analyzer.extract(text, "(author)");
        if tags.is_empty() {
            println!("  no tags");
            continue;
        }

        for tag in tags {
            let date = match &tag.date {
                TagDate::Explicit(date) => date.to_string(),
                TagDate::Unparsed(token) => format!("invalid token {:?}", token),
                TagDate::CommentTime => "comment time".to_string(),
            };
            println!(
                "  @{:<6} offset {:>3}  {:<22} {:?}",
                tag.action.to_string(),
                tag.match_offset,
                date,
                tag.names
            );
        }
    }
}
