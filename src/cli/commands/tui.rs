//! unisearch tui - Interactive terminal search

use clap::Args;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct TuiArgs {
    /// Start with this query already submitted
    #[arg(long, short)]
    pub query: Option<String>,
}

pub fn run(ctx: &AppContext, args: &TuiArgs) -> Result<()> {
    crate::tui::run_search_tui(ctx, args.query.as_deref())
}
