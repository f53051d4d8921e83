use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

use crate::cli::Cli;

#[derive(Debug, Clone, Copy)]
pub struct CompletionsCommand {
    pub shell: Shell,
}

impl CompletionsCommand {
    pub fn execute<W: Write>(self, out: &mut W) {
        let mut cmd = Cli::command();
        let app_name = cmd.get_name().to_string();
        clap_complete::generate(self.shell, &mut cmd, app_name, out);
    }
}
