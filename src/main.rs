use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use env_logger::Builder;
use log::LevelFilter;

use ntpd_remote::cli::{self, Target};
use ntpd_remote::Result;

#[derive(Parser)]
#[command(name = "ntpd-remote")]
#[command(author = "Oleg")]
#[command(version = "0.1.0")]
#[command(about = "Удалённое управление конфигурацией NTP на тестовых узлах", long_about = None)]
struct Cli {
    #[command(flatten)]
    target: TargetArgs,

    /// Подробный вывод (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TargetArgs {
    /// Имя узла из реестра
    #[arg(long, global = true, conflicts_with = "local")]
    node: Option<String>,

    /// Выполнять команды локально, без SSH
    #[arg(long, global = true)]
    local: bool,

    /// Путь к реестру узлов
    #[arg(long, global = true, value_name = "PATH")]
    nodes_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Запустить ntpd
    Start,

    /// Остановить ntpd
    Stop,

    /// Запустить ntpd с /etc/ntp.conf (и /etc/ntp.keys)
    Configure {
        /// Использовать файл ключей /etc/ntp.keys
        #[arg(long)]
        keyfile: bool,

        /// Номер доверенного ключа (обязателен с --keyfile)
        #[arg(long, allow_negative_numbers = true)]
        trusted_key: Option<i64>,
    },

    /// Серверы в /etc/ntp.conf
    Server {
        #[command(subcommand)]
        action: ServerCommands,
    },

    /// Доверенные ключи в /etc/ntp.conf
    TrustedKey {
        #[command(subcommand)]
        action: TrustedKeyCommands,
    },

    /// Пароли ключей в /etc/ntp.keys
    Password {
        #[command(subcommand)]
        action: PasswordCommands,
    },

    /// Управление реестром узлов
    Node {
        #[command(subcommand)]
        action: NodeCommands,
    },
}

#[derive(Subcommand)]
enum ServerCommands {
    /// Добавить сервер
    Add { address: String },
    /// Удалить сервер
    Remove { address: String },
}

#[derive(Subcommand)]
enum TrustedKeyCommands {
    /// Добавить доверенный ключ
    Add {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Удалить доверенный ключ
    Remove {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

#[derive(Subcommand)]
enum PasswordCommands {
    /// Добавить пароль ключа
    Add {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        /// Тип хеша (по умолчанию M - MD5)
        #[arg(long = "type", value_name = "TYPE")]
        hash_type: Option<String>,
    },
    /// Удалить пароль ключа
    Remove {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

#[derive(Subcommand)]
enum NodeCommands {
    /// Добавить новый узел
    Add,
    /// Показать список узлов
    List,
    /// Удалить узел
    Remove {
        /// Имя узла для удаления
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Ошибка:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter(Some("ntpd_remote"), level)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let target = Target {
        node: cli.target.node,
        local: cli.target.local,
        nodes_file: cli.target.nodes_file,
    };

    match cli.command {
        Commands::Start => cli::daemon::start(&target),
        Commands::Stop => cli::daemon::stop(&target),
        Commands::Configure { keyfile, trusted_key } => {
            cli::daemon::configure(&target, keyfile, trusted_key)
        }
        Commands::Server { action } => match action {
            ServerCommands::Add { address } => cli::server::add(&target, &address),
            ServerCommands::Remove { address } => cli::server::remove(&target, &address),
        },
        Commands::TrustedKey { action } => match action {
            TrustedKeyCommands::Add { id } => cli::key::add_trusted(&target, id),
            TrustedKeyCommands::Remove { id } => cli::key::remove_trusted(&target, id),
        },
        Commands::Password { action } => match action {
            PasswordCommands::Add { id, hash_type } => cli::key::add_password(&target, id, hash_type),
            PasswordCommands::Remove { id } => cli::key::remove_password(&target, id),
        },
        Commands::Node { action } => match action {
            NodeCommands::Add => cli::node::add(&target),
            NodeCommands::List => cli::node::list(&target),
            NodeCommands::Remove { name } => cli::node::remove(&target, &name),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_key_ids() {
        let cli = Cli::try_parse_from(["ntpd-remote", "--local", "trusted-key", "add", "-5"]).unwrap();
        assert!(cli.target.local);
        match cli.command {
            Commands::TrustedKey { action: TrustedKeyCommands::Add { id } } => assert_eq!(id, -5),
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn node_and_local_conflict() {
        assert!(Cli::try_parse_from(["ntpd-remote", "--local", "--node", "a", "start"]).is_err());
    }

    #[test]
    fn configure_flags() {
        let cli = Cli::try_parse_from([
            "ntpd-remote", "configure", "--keyfile", "--trusted-key", "7",
        ])
        .unwrap();
        match cli.command {
            Commands::Configure { keyfile, trusted_key } => {
                assert!(keyfile);
                assert_eq!(trusted_key, Some(7));
            }
            _ => panic!("wrong subcommand"),
        }
    }
}
