use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Task board over a hosted task table.
/// Connection settings come from ~/.task_board/config.toml, TASK_BOARD__*
/// variables or the flags below.
#[derive(Parser)]
#[command(name = "tb", version, about = "Task board for a hosted task table")]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Project URL of the hosted database.
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Table holding the tasks.
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Defaults to `ui`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::fields::StatusArg;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["tb", "--table", "demandas"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.table.as_deref(), Some("demandas"));
    }

    #[test]
    fn test_add_accepts_status_aliases() {
        let cli = Cli::try_parse_from([
            "tb", "add", "Nova", "--desc", "Detalhes", "--trigger", "E-mail", "--status", "done",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add { title, status, .. }) => {
                assert_eq!(title, "Nova");
                assert_eq!(status, StatusArg::Concluido);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tb", "list", "--url", "http://localhost:54321"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://localhost:54321"));
    }
}
