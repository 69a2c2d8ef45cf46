mod terminal;

use anyhow::{Result, anyhow};
use clap::Parser;
use ga_admin_core::{ActionOutcome, AdminAction, AdminConsole};
use ga_chain_client::WalletProvider;
use ga_chain_rpc::{DEFAULT_BACKEND_URL, DEFAULT_RPC_URL, HttpContractRegistry, JsonRpcWalletProvider};
use std::rc::Rc;
use terminal::{StdinPrompt, TerminalSurface};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "gremlin-admin", version, about = "Sysadmin console for the Gremlin contracts")]
struct Cli {
    /// Backend serving `/contract_data`.
    #[arg(long, env = "GREMLIN_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// JSON-RPC wallet endpoint that signs for the authorized account.
    #[arg(long, env = "GREMLIN_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Hooks to run in order (e.g. `connect add-moderator`); reads them
    /// from stdin when omitted.
    #[arg(value_name = "HOOK")]
    hooks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Connect,
    Action(AdminAction),
    Overview,
    Help,
    Quit,
}

fn parse_hook(input: &str) -> Result<Hook> {
    let name = input.trim();
    match name {
        "connect" => Ok(Hook::Connect),
        "overview" => Ok(Hook::Overview),
        "help" | "?" => Ok(Hook::Help),
        "quit" | "exit" => Ok(Hook::Quit),
        other => AdminAction::from_command_name(other)
            .map(Hook::Action)
            .ok_or_else(|| anyhow!("unknown command {other:?}, try `help`")),
    }
}

fn print_help() {
    println!("commands:");
    println!("  connect");
    for action in AdminAction::ALL {
        println!("  {:<18} {}", action.command_name(), action.spec().method);
    }
    println!("  overview");
    println!("  quit");
}

/// Returns `false` when the session should end.
async fn run_hook(console: &AdminConsole, hook: Hook) -> bool {
    match hook {
        Hook::Connect => {
            if let Ok(active) = console.connect().await {
                println!("connected as {}", active.session.authorized_address());
            }
        }
        Hook::Action(action) => {
            if let ActionOutcome::Confirmed(tx) = console.run(action).await {
                match tx.block_number {
                    Some(block) => println!("tx {} mined in block {block}", tx.tx_hash),
                    None => println!("tx {} mined", tx.tx_hash),
                }
            }
        }
        Hook::Overview => match console.overview().await {
            Ok(lines) => {
                for line in lines {
                    match line.value {
                        Ok(value) => println!("{:<16} {value}", line.label),
                        Err(_) => println!("{:<16} unavailable", line.label),
                    }
                }
            }
            Err(err) => println!("{err}"),
        },
        Hook::Help => print_help(),
        Hook::Quit => return false,
    }
    true
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(backend = %cli.backend_url, rpc = %cli.rpc_url, "gremlin-admin starting");

    let provider: Rc<dyn WalletProvider> = Rc::new(JsonRpcWalletProvider::new(Some(cli.rpc_url)));
    let console = AdminConsole::new(
        Some(provider),
        Rc::new(HttpContractRegistry::new(Some(cli.backend_url))),
        Rc::new(StdinPrompt),
        Rc::new(TerminalSurface),
    );

    if !cli.hooks.is_empty() {
        let hooks = cli
            .hooks
            .iter()
            .map(|hook| parse_hook(hook))
            .collect::<Result<Vec<_>>>()?;
        for hook in hooks {
            if !run_hook(&console, hook).await {
                break;
            }
        }
        return Ok(());
    }

    print_help();
    loop {
        print!("> ");
        std::io::Write::flush(&mut std::io::stdout())?;
        let Some(line) = terminal::read_line() else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_hook(&line) {
            Ok(hook) => {
                if !run_hook(&console, hook).await {
                    break;
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    Ok(())
}
