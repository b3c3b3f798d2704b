//! Typed settings for each function, resolved once at cold start.
//!
//! Every constructor has a `from_lookup` form taking a variable reader so
//! tests never touch the process environment. Empty values count as unset.

use lettre::message::Mailbox;

use crate::error::ConfigError;

/// How the SMTP session is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// TLS from the first byte (port 465 style).
    ImplicitTls,
    /// Plain connect, then `STARTTLS` before authenticating.
    StartTls,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub username: String,
    pub password: String,
}

/// Contact form: one mailbox on the mail.ru relay is both sender and inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSettings {
    pub smtp: SmtpSettings,
    pub mailbox: String,
}

/// Quote requests: configurable relay, sent from the SMTP user to a recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteSettings {
    pub smtp: SmtpSettings,
    pub recipient: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationSettings {
    pub smtp: SmtpSettings,
    pub from_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub database_url: String,
}

const CONTACT_RELAY_HOST: &str = "smtp.mail.ru";
const CONTACT_RELAY_PORT: u16 = 465;

const QUOTE_DEFAULT_HOST: &str = "smtp.yandex.ru";
const QUOTE_DEFAULT_PORT: u16 = 465;
const QUOTE_DEFAULT_RECIPIENT: &str = "info@systemcraft.ru";

const INVITATION_DEFAULT_HOST: &str = "smtp.gmail.com";
const INVITATION_DEFAULT_PORT: u16 = 587;

fn read<F>(lookup: &F, name: &'static str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    read(lookup, name).ok_or(ConfigError::Missing(name))
}

fn port<F>(lookup: &F, name: &'static str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match read(lookup, name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort { name, value }),
        None => Ok(default),
    }
}

/// Addresses are checked up front so a typo fails the deploy instead of every send.
fn mailbox(name: &'static str, value: String) -> Result<String, ConfigError> {
    match value.parse::<Mailbox>() {
        Ok(_) => Ok(value),
        Err(_) => Err(ConfigError::InvalidMailbox { name, value }),
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl ContactSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mailbox = mailbox("SMTP_EMAIL", required(&lookup, "SMTP_EMAIL")?)?;
        let password = required(&lookup, "SMTP_PASSWORD")?;

        Ok(ContactSettings {
            smtp: SmtpSettings {
                host: CONTACT_RELAY_HOST.to_string(),
                port: CONTACT_RELAY_PORT,
                security: SmtpSecurity::ImplicitTls,
                username: mailbox.clone(),
                password,
            },
            mailbox,
        })
    }
}

impl QuoteSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = read(&lookup, "SMTP_HOST").unwrap_or_else(|| QUOTE_DEFAULT_HOST.to_string());
        let port = port(&lookup, "SMTP_PORT", QUOTE_DEFAULT_PORT)?;
        let username = mailbox("SMTP_USER", required(&lookup, "SMTP_USER")?)?;
        let password = required(&lookup, "SMTP_PASSWORD")?;
        let recipient = mailbox(
            "RECIPIENT_EMAIL",
            read(&lookup, "RECIPIENT_EMAIL").unwrap_or_else(|| QUOTE_DEFAULT_RECIPIENT.to_string()),
        )?;

        Ok(QuoteSettings {
            smtp: SmtpSettings {
                host,
                port,
                security: SmtpSecurity::ImplicitTls,
                username,
                password,
            },
            recipient,
        })
    }
}

impl InvitationSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = read(&lookup, "SMTP_HOST").unwrap_or_else(|| INVITATION_DEFAULT_HOST.to_string());
        let port = port(&lookup, "SMTP_PORT", INVITATION_DEFAULT_PORT)?;
        let username = required(&lookup, "SMTP_USER")?;
        let password = required(&lookup, "SMTP_PASSWORD")?;
        let from_email = match read(&lookup, "FROM_EMAIL") {
            Some(from) => mailbox("FROM_EMAIL", from)?,
            None => mailbox("SMTP_USER", username.clone())?,
        };

        Ok(InvitationSettings {
            smtp: SmtpSettings {
                host,
                port,
                security: SmtpSecurity::StartTls,
                username,
                password,
            },
            from_email,
        })
    }
}

impl DatabaseSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(DatabaseSettings {
            database_url: required(&lookup, "DATABASE_URL")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_contact_uses_fixed_relay() {
        let settings = ContactSettings::from_lookup(vars(&[
            ("SMTP_EMAIL", "inbox@mail.ru"),
            ("SMTP_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(settings.mailbox, "inbox@mail.ru");
        assert_eq!(settings.smtp.host, "smtp.mail.ru");
        assert_eq!(settings.smtp.port, 465);
        assert_eq!(settings.smtp.security, SmtpSecurity::ImplicitTls);
        assert_eq!(settings.smtp.username, "inbox@mail.ru");
    }

    #[test]
    fn test_contact_requires_credentials() {
        let err = ContactSettings::from_lookup(vars(&[("SMTP_EMAIL", "inbox@mail.ru")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SMTP_PASSWORD"));

        let err = ContactSettings::from_lookup(vars(&[
            ("SMTP_EMAIL", "  "),
            ("SMTP_PASSWORD", "secret"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("SMTP_EMAIL"));
    }

    #[test]
    fn test_quote_defaults() {
        let settings = QuoteSettings::from_lookup(vars(&[
            ("SMTP_USER", "robot@yandex.ru"),
            ("SMTP_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(settings.smtp.host, "smtp.yandex.ru");
        assert_eq!(settings.smtp.port, 465);
        assert_eq!(settings.recipient, "info@systemcraft.ru");
    }

    #[test]
    fn test_quote_overrides_and_bad_port() {
        let settings = QuoteSettings::from_lookup(vars(&[
            ("SMTP_HOST", "smtp.example.org"),
            ("SMTP_PORT", "2465"),
            ("SMTP_USER", "robot@example.org"),
            ("SMTP_PASSWORD", "secret"),
            ("RECIPIENT_EMAIL", "sales@example.org"),
        ]))
        .unwrap();
        assert_eq!(settings.smtp.host, "smtp.example.org");
        assert_eq!(settings.smtp.port, 2465);
        assert_eq!(settings.recipient, "sales@example.org");

        let err = QuoteSettings::from_lookup(vars(&[
            ("SMTP_PORT", "smtp"),
            ("SMTP_USER", "robot@example.org"),
            ("SMTP_PASSWORD", "secret"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPort { name: "SMTP_PORT", value: "smtp".to_string() }
        );
    }

    #[test]
    fn test_invitation_from_defaults_to_user() {
        let settings = InvitationSettings::from_lookup(vars(&[
            ("SMTP_USER", "robot@gmail.com"),
            ("SMTP_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(settings.from_email, "robot@gmail.com");
        assert_eq!(settings.smtp.host, "smtp.gmail.com");
        assert_eq!(settings.smtp.port, 587);
        assert_eq!(settings.smtp.security, SmtpSecurity::StartTls);

        let settings = InvitationSettings::from_lookup(vars(&[
            ("SMTP_USER", "apikey"),
            ("SMTP_PASSWORD", "secret"),
            ("FROM_EMAIL", "noreply@systemcraft.ru"),
        ]))
        .unwrap();
        assert_eq!(settings.from_email, "noreply@systemcraft.ru");
        assert_eq!(settings.smtp.username, "apikey");
    }

    #[test]
    fn test_invitation_rejects_non_mailbox_sender() {
        let err = InvitationSettings::from_lookup(vars(&[
            ("SMTP_USER", "apikey"),
            ("SMTP_PASSWORD", "secret"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidMailbox { name: "SMTP_USER", value: "apikey".to_string() }
        );
    }

    #[test]
    fn test_database_url_required() {
        assert_eq!(
            DatabaseSettings::from_lookup(vars(&[])).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
        let settings = DatabaseSettings::from_lookup(vars(&[("DATABASE_URL", "postgres://db/site")])).unwrap();
        assert_eq!(settings.database_url, "postgres://db/site");
    }
}
