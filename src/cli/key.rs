//! Доверенные ключи и их пароли

use secrecy::SecretString;

use crate::error::Result;
use crate::ntpd::{HashType, TrustedKeyId};

use super::{success, with_editor, Target};

pub fn add_trusted(target: &Target, id: i64) -> Result<()> {
    with_editor(target, |editor| editor.add_trusted_key(id))?;
    success(&format!("Доверенный ключ {} добавлен.", id));
    Ok(())
}

pub fn remove_trusted(target: &Target, id: i64) -> Result<()> {
    with_editor(target, |editor| editor.remove_trusted_key(id))?;
    success(&format!("Доверенный ключ {} удалён.", id));
    Ok(())
}

/// Добавить пароль ключа, сам пароль вводится без отображения
pub fn add_password(target: &Target, id: i64, hash_type: Option<String>) -> Result<()> {
    // Проверить аргументы до запроса пароля и подключения
    TrustedKeyId::new(id)?;
    let hash_type = match hash_type {
        Some(value) => HashType::new(value)?,
        None => HashType::default(),
    };

    let password = SecretString::new(rpassword::prompt_password(format!(
        "Пароль для ключа {}: ",
        id
    ))?);

    with_editor(target, |editor| {
        editor.add_trusted_key_password(id, &password, &hash_type)
    })?;
    success(&format!("Пароль ключа {} ({}) добавлен.", id, hash_type));
    Ok(())
}

pub fn remove_password(target: &Target, id: i64) -> Result<()> {
    with_editor(target, |editor| editor.remove_trusted_key_password(id))?;
    success(&format!("Пароль ключа {} удалён.", id));
    Ok(())
}
