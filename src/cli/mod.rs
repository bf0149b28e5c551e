//! Реализация CLI команд

pub mod daemon;
pub mod key;
pub mod node;
pub mod server;

use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use log::info;

use crate::channel::{CommandChannel, LocalChannel, Shell, SshChannel};
use crate::config::{self, Node, NodeList};
use crate::error::{NtpdError, Result};
use crate::ntpd::NtpdEditor;

/// Куда отправлять команды
#[derive(Debug, Clone, Default)]
pub struct Target {
    /// Имя узла из реестра
    pub node: Option<String>,
    /// Выполнять команды на этой машине
    pub local: bool,
    /// Путь к реестру узлов
    pub nodes_file: Option<PathBuf>,
}

impl Target {
    pub fn nodes_path(&self) -> Result<PathBuf> {
        match &self.nodes_file {
            Some(path) => Ok(path.clone()),
            None => config::default_nodes_path(),
        }
    }
}

/// Канал, выбранный для текущего запуска
pub enum NodeChannel {
    Local(LocalChannel),
    Ssh(SshChannel),
}

impl NodeChannel {
    pub fn open(target: &Target) -> Result<Self> {
        if target.local {
            info!("using the local shell");
            return Ok(Self::Local(LocalChannel::new()));
        }

        let nodes = config::load_nodes(&target.nodes_path()?)?;
        let node = select_node(&nodes, target.node.as_deref())?;

        println!(
            "{} {}",
            "Подключение к:".cyan(),
            node.connection_string().bold()
        );
        Ok(Self::Ssh(SshChannel::connect(node)?))
    }

    pub fn close(self) -> Result<()> {
        match self {
            Self::Local(_) => Ok(()),
            Self::Ssh(channel) => channel.close(),
        }
    }
}

impl CommandChannel for NodeChannel {
    fn execute(&mut self, command: &str, shell: Shell) -> Result<String> {
        match self {
            Self::Local(channel) => channel.execute(command, shell),
            Self::Ssh(channel) => channel.execute(command, shell),
        }
    }
}

/// Открыть канал, выполнить операцию редактора и закрыть канал
pub fn with_editor<F>(target: &Target, op: F) -> Result<()>
where
    F: FnOnce(&mut NtpdEditor<&mut NodeChannel>) -> Result<()>,
{
    let mut channel = NodeChannel::open(target)?;
    let result = op(&mut NtpdEditor::new(&mut channel));
    let closed = channel.close();
    result.and(closed)
}

/// Выбрать узел из реестра
fn select_node<'a>(nodes: &'a NodeList, name: Option<&str>) -> Result<&'a Node> {
    if let Some(name) = name {
        return nodes
            .get(name)
            .ok_or_else(|| NtpdError::NodeNotFound(name.to_string()));
    }

    if nodes.is_empty() {
        return Err(NtpdError::NoNodesConfigured);
    }

    // Только один узел - используем его
    if let Some(node) = nodes.single() {
        return Ok(node);
    }

    println!("{}", "Доступные узлы:".cyan().bold());
    println!();

    for (i, node) in nodes.iter().enumerate() {
        println!(
            "  {} {} - {}",
            format!("[{}]", i + 1).cyan(),
            node.name.bold(),
            node.connection_string()
        );
    }

    println!();
    print!("Выберите узел [1-{}]: ", nodes.len());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let index = parse_choice(&input, nodes.len())?;
    nodes
        .iter()
        .nth(index)
        .ok_or_else(|| NtpdError::InvalidConfig("Неверный выбор".into()))
}

/// Разобрать номер из меню `[1-count]`, вернуть индекс с нуля
fn parse_choice(input: &str, count: usize) -> Result<usize> {
    let choice: usize = input
        .trim()
        .parse()
        .map_err(|_| NtpdError::InvalidConfig("Неверный выбор".into()))?;

    if choice < 1 || choice > count {
        return Err(NtpdError::InvalidConfig("Неверный выбор".into()));
    }

    Ok(choice - 1)
}

/// Запросить строку у пользователя
pub fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Запросить подтверждение да/нет
pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes" | "д" | "да")
}

/// Сообщить об успешном завершении
pub(crate) fn success(message: &str) {
    println!("{} {}", "Успех:".green().bold(), message);
}
