use anyhow::Result;
use swatch_cli::output::{render_json, render_table};
use swatch_cli::replay::{load_events, replay};
use swatch_cli::theme::{apply_edits, load_session};
use swatch_core::ColorState;
use tracing::info_span;

use crate::cli::{OutputFormatArg, ReplayArgs, SetArgs, ThemeArgs};

pub fn run_palette(args: &ThemeArgs) -> Result<()> {
    let session = load_session(args.theme.as_deref())?;
    print_state(session.state(), args.format)
}

pub fn run_set(args: &SetArgs) -> Result<()> {
    let span = info_span!("set", edits = args.edits.len());
    let _guard = span.enter();
    let mut session = load_session(args.theme.theme.as_deref())?;
    apply_edits(&mut session, &args.edits)?;
    print_state(session.state(), args.theme.format)
}

pub fn run_replay(args: &ReplayArgs) -> Result<()> {
    let span = info_span!("replay", events = %args.events.display());
    let _guard = span.enter();
    let events = load_events(&args.events)?;
    let mut session = load_session(args.theme.theme.as_deref())?;
    let commits = replay(&mut session, &events)?;
    if matches!(args.theme.format, OutputFormatArg::Table) {
        for commit in &commits {
            println!("{:>6} ms  committed {}", commit.at_ms, commit.category);
        }
    }
    print_state(session.state(), args.theme.format)
}

fn print_state(state: &ColorState, format: OutputFormatArg) -> Result<()> {
    match format {
        OutputFormatArg::Table => println!("{}", render_table(state)),
        OutputFormatArg::Json => println!("{}", render_json(state)?),
    }
    Ok(())
}
