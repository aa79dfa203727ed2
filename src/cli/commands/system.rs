use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::storage::json_backend::JSON_SCHEMA_VERSION;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit).with_aliases(&["quit", "q"]),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Pocket Ledger {}", meta.version));
    output::info(format!("  JSON schema : v{}", JSON_SCHEMA_VERSION));
    output::info(format!(
        "  Build hash  : {} ({})",
        meta.git_hash, meta.git_status
    ));
    output::info(format!("  Built at    : {}", meta.timestamp));
    output::info(format!("  Target      : {} [{}]", meta.target, meta.profile));
    output::info(format!("  Rustc       : {}", meta.rustc));
    match context.manager().store() {
        Some(store) => output::info(format!("  Data file   : {}", store.location().display())),
        None => output::info("  Data file   : none (autosave off)"),
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.registry().get(&name.to_ascii_lowercase()) {
            Some(entry) => {
                output::section(entry.name);
                output::info(entry.description);
                output::info(format!("usage: {}", entry.usage));
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    print_overview(context.registry());
    Ok(())
}

fn print_overview(registry: &CommandRegistry) {
    output::section("Commands");
    let width = registry.names().map(str::len).max().unwrap_or(0);
    for entry in registry.list() {
        println!("  {:<width$}  {}", entry.name, entry.description);
    }
    output::hint("Row numbers shown by `list` are used by `update` and `delete`.");
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
