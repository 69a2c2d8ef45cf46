use ga_admin_core::{AdminAction, AdminSurface, ParameterPrompt};
use std::io::{self, BufRead, Write};
use tracing::error;

/// Reads one line from stdin; end of input counts as cancel.
pub struct StdinPrompt;

impl ParameterPrompt for StdinPrompt {
    fn request(&self, message: &str) -> Option<String> {
        print!("{message} ");
        io::stdout().flush().ok()?;
        read_line()
    }
}

pub fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_owned()),
        Err(err) => {
            error!("stdin read failed: {err}");
            None
        }
    }
}

pub struct TerminalSurface;

impl AdminSurface for TerminalSurface {
    fn notify(&self, message: &str) {
        println!("{message}");
    }

    fn diagnostic(&self, message: &str) {
        error!("{message}");
    }

    fn set_admin_controls_visible(&self, visible: bool) {
        if visible {
            let commands: Vec<&str> = AdminAction::ALL
                .into_iter()
                .map(AdminAction::command_name)
                .collect();
            println!("sysadmin commands: {}, overview", commands.join(", "));
        }
    }
}
