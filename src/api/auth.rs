//! Credential resolution.

use std::io::BufRead;

use console::Term;

use crate::error::{Error, Result};

/// Environment variable holding the Synapse username.
pub const USERNAME_ENV: &str = "SYNAPSE_USERNAME";

/// Environment variable holding the Synapse password.
pub const PASSWORD_ENV: &str = "SYNAPSE_PASSWORD";

/// Username and password, each possibly not yet known.
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Source of interactively entered credentials.
pub trait CredentialPrompt: Send + Sync {
    /// Ask for the username with visible input.
    fn username(&self) -> Result<String>;

    /// Ask for the password with masked input.
    fn password(&self) -> Result<String>;
}

/// Prompt on the controlling terminal.
///
/// When stderr is not a terminal the answers are read line by line from
/// stdin instead, so piped input still works.
#[derive(Debug, Default)]
pub struct TermPrompt;

impl CredentialPrompt for TermPrompt {
    fn username(&self) -> Result<String> {
        let term = Term::stderr();
        if !term.is_term() {
            eprint!("Synapse username: ");
            return read_piped_line(&mut std::io::stdin().lock(), "username");
        }
        term.write_str("Synapse username: ")?;
        Ok(term.read_line()?)
    }

    fn password(&self) -> Result<String> {
        let term = Term::stderr();
        if !term.is_term() {
            eprint!("Synapse password: ");
            return read_piped_line(&mut std::io::stdin().lock(), "password");
        }
        term.write_str("Synapse password: ")?;
        Ok(term.read_secure_line()?)
    }
}

/// Read one answer from non-interactive input, without its line ending.
fn read_piped_line<R: BufRead>(reader: &mut R, field: &str) -> Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(Error::Authentication(format!(
            "No {} given: stdin is closed and there is no terminal to prompt on",
            field
        )));
    }
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    /// Fill in missing fields from the process environment, then the prompt.
    pub fn resolve(&self, prompt: &dyn CredentialPrompt) -> Result<(String, String)> {
        self.resolve_with(|key| std::env::var(key).ok(), prompt)
    }

    /// Fill in missing fields in priority order: explicit value, `env`
    /// lookup, interactive prompt. Username and password resolve
    /// independently.
    pub fn resolve_with<F>(&self, env: F, prompt: &dyn CredentialPrompt) -> Result<(String, String)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = match non_empty(self.username.clone()).or_else(|| non_empty(env(USERNAME_ENV))) {
            Some(username) => username,
            None => prompt.username()?,
        };

        let password = match non_empty(self.password.clone()).or_else(|| non_empty(env(PASSWORD_ENV))) {
            Some(password) => password,
            None => prompt.password()?,
        };

        Ok((username, password))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingPrompt {
        asked: AtomicUsize,
    }

    impl CredentialPrompt for CountingPrompt {
        fn username(&self) -> Result<String> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            Ok("prompted-user".to_string())
        }

        fn password(&self) -> Result<String> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            Ok("prompted-pass".to_string())
        }
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_wins() {
        let prompt = CountingPrompt::default();
        let creds = Credentials::new(Some("alice".into()), Some("secret".into()));
        let env = env_of(&[(USERNAME_ENV, "env-user"), (PASSWORD_ENV, "env-pass")]);

        let (user, pass) = creds.resolve_with(env, &prompt).unwrap();
        assert_eq!(user, "alice");
        assert_eq!(pass, "secret");
        assert_eq!(prompt.asked.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_env_before_prompt() {
        let prompt = CountingPrompt::default();
        let creds = Credentials::default();
        let env = env_of(&[(USERNAME_ENV, "env-user"), (PASSWORD_ENV, "env-pass")]);

        let (user, pass) = creds.resolve_with(env, &prompt).unwrap();
        assert_eq!(user, "env-user");
        assert_eq!(pass, "env-pass");
        assert_eq!(prompt.asked.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fields_resolve_independently() {
        let prompt = CountingPrompt::default();
        let creds = Credentials::new(Some("alice".into()), None);

        let (user, pass) = creds.resolve_with(env_of(&[]), &prompt).unwrap();
        assert_eq!(user, "alice");
        assert_eq!(pass, "prompted-pass");
        assert_eq!(prompt.asked.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_values_fall_through() {
        let prompt = CountingPrompt::default();
        let creds = Credentials::new(Some(String::new()), None);
        let env = env_of(&[(USERNAME_ENV, ""), (PASSWORD_ENV, "env-pass")]);

        let (user, pass) = creds.resolve_with(env, &prompt).unwrap();
        assert_eq!(user, "prompted-user");
        assert_eq!(pass, "env-pass");
    }

    #[test]
    fn test_piped_answers_read_in_order() {
        let mut input = std::io::Cursor::new("alice\r\nsecret\n");

        assert_eq!(read_piped_line(&mut input, "username").unwrap(), "alice");
        assert_eq!(read_piped_line(&mut input, "password").unwrap(), "secret");
    }

    #[test]
    fn test_piped_input_closed() {
        let mut input = std::io::Cursor::new("alice\n");
        read_piped_line(&mut input, "username").unwrap();

        let err = read_piped_line(&mut input, "password").unwrap_err();
        match err {
            Error::Authentication(msg) => assert!(msg.contains("password")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new(Some("alice".into()), Some("secret".into()));
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret"));
    }
}
