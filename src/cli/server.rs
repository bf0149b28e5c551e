//! Команды управления NTP-серверами в /etc/ntp.conf

use crate::error::Result;

use super::{success, with_editor, Target};

/// Добавить сервер
pub fn add(target: &Target, address: &str) -> Result<()> {
    with_editor(target, |editor| editor.add_server(address))?;
    success(&format!("Сервер '{}' добавлен.", address));
    Ok(())
}

/// Удалить все строки, содержащие адрес
pub fn remove(target: &Target, address: &str) -> Result<()> {
    with_editor(target, |editor| editor.remove_server(address))?;
    success(&format!("Сервер '{}' удалён.", address));
    Ok(())
}
