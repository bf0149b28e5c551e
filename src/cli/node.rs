//! Команды управления реестром узлов

use colored::Colorize;

use crate::config::{self, default_identity_file, Node};
use crate::error::{NtpdError, Result};

use super::{confirm, prompt, success, Target};

/// Добавить новый узел
pub fn add(target: &Target) -> Result<()> {
    let path = target.nodes_path()?;
    let mut nodes = config::load_nodes(&path)?;

    println!("{}", "=== Добавление узла ===".cyan().bold());
    println!();

    let node = prompt_node_details()?;
    let name = node.name.clone();
    nodes.add(node)?;
    config::save_nodes(&path, &nodes)?;

    println!();
    success(&format!("Узел '{}' добавлен!", name));
    Ok(())
}

/// Показать список всех узлов
pub fn list(target: &Target) -> Result<()> {
    let nodes = config::load_nodes(&target.nodes_path()?)?;

    println!("{}", "=== Настроенные узлы ===".cyan().bold());
    println!();

    if nodes.is_empty() {
        println!("Узлы не настроены.");
        println!();
        println!(
            "Выполните {} для добавления узла.",
            "ntpd-remote node add".cyan()
        );
        return Ok(());
    }

    println!(
        "{:<15} {:<30} {:<20}",
        "ИМЯ".bold(),
        "ПОДКЛЮЧЕНИЕ".bold(),
        "ОПИСАНИЕ".bold()
    );
    println!("{}", "─".repeat(65).dimmed());

    for node in nodes.iter() {
        println!(
            "{:<15} {:<30} {:<20}",
            node.name,
            node.connection_string(),
            node.description
        );
    }

    println!();
    Ok(())
}

/// Удалить узел
pub fn remove(target: &Target, name: &str) -> Result<()> {
    let path = target.nodes_path()?;
    let mut nodes = config::load_nodes(&path)?;

    if nodes.get(name).is_none() {
        return Err(NtpdError::NodeNotFound(name.to_string()));
    }

    if !confirm(&format!("Удалить узел '{}'?", name)) {
        println!("Отменено.");
        return Ok(());
    }

    nodes.remove(name);
    config::save_nodes(&path, &nodes)?;

    success(&format!("Узел '{}' удалён.", name));
    Ok(())
}

/// Запросить данные узла
fn prompt_node_details() -> Result<Node> {
    let name = prompt("Имя узла: ")?;
    if name.is_empty() {
        return Err(NtpdError::InvalidConfig("Имя узла не может быть пустым".into()));
    }

    let host = prompt("Хост/IP: ")?;
    if host.is_empty() {
        return Err(NtpdError::InvalidConfig("Хост не может быть пустым".into()));
    }

    let port_str = prompt("Порт [22]: ")?;
    let port: u16 = if port_str.is_empty() {
        22
    } else {
        port_str
            .parse()
            .map_err(|_| NtpdError::InvalidConfig("Неверный номер порта".into()))?
    };

    let user = prompt("Имя пользователя [root]: ")?;
    let user = if user.is_empty() { "root".to_string() } else { user };

    let default_key = default_identity_file();
    let identity = prompt(&format!("Приватный ключ [{}]: ", default_key.display()))?;

    let description = prompt("Описание (опционально): ")?;
    let check_host_key = confirm("Проверять ключ хоста по known_hosts?");

    let mut node = Node::new(name, host, port, user).with_host_key_check(check_host_key);
    if !identity.is_empty() {
        node = node.with_identity_file(identity);
    }
    if !description.is_empty() {
        node = node.with_description(description);
    }

    Ok(node)
}
