//! unisearch highlight - Mark query matches inside text

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{emit_json, robot_ok};
use crate::error::Result;
use crate::highlight::{Highlighter, Segment};

#[derive(Args, Debug)]
pub struct HighlightArgs {
    /// Text to search in
    pub text: String,

    /// Query to highlight
    pub query: String,

    /// Treat the query as a regular expression
    #[arg(long)]
    pub pattern: bool,
}

#[derive(Serialize)]
struct HighlightReport {
    markup: String,
    segments: Vec<Segment>,
}

pub fn run(ctx: &AppContext, args: &HighlightArgs) -> Result<()> {
    let highlighter = if args.pattern {
        Highlighter::pattern(&args.query)?
    } else {
        Highlighter::literal(&args.query)?
    };
    let markup = highlighter.markup(&args.text);

    if ctx.robot_mode {
        emit_json(&robot_ok(HighlightReport {
            segments: highlighter.segments(&args.text),
            markup,
        }))
    } else {
        println!("{markup}");
        Ok(())
    }
}
