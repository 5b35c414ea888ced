//! Completions command - generate shell completion scripts

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::CairnResult;
use clap::CommandFactory;
use clap_complete::generate;
use std::io;

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> CairnResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
