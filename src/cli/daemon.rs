//! Запуск, остановка и настройка демона ntpd

use crate::error::Result;

use super::{success, with_editor, Target};

pub fn start(target: &Target) -> Result<()> {
    with_editor(target, |editor| editor.start())?;
    success("ntpd запущен.");
    Ok(())
}

pub fn stop(target: &Target) -> Result<()> {
    with_editor(target, |editor| editor.stop())?;
    success("ntpd остановлен.");
    Ok(())
}

/// Запустить ntpd с /etc/ntp.conf и, при необходимости, с /etc/ntp.keys
pub fn configure(target: &Target, keyfile: bool, trusted_key: Option<i64>) -> Result<()> {
    with_editor(target, |editor| editor.configure_daemon_files(keyfile, trusted_key))?;

    if keyfile {
        success("ntpd настроен на файл ключей.");
    } else {
        success("ntpd настроен.");
    }
    Ok(())
}
