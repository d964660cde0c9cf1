//! The user roster: a lazily-populated list of login candidates.

use std::path::PathBuf;

use crate::{UserError, UserRecord};

/// Shells that mark an account as not interactively loginable.
const NOLOGIN_SHELLS: &[&str] = &["/usr/sbin/nologin", "/sbin/nologin", "/bin/false"];

/// Supplies the list of users the greeter may offer.
pub trait UserSource {
    fn load_users(&self) -> Result<Vec<UserRecord>, UserError>;
}

// ---------------------------------------------------------------------------
// PasswdFile
// ---------------------------------------------------------------------------

/// A [`UserSource`] reading passwd-format entries
/// (`name:x:uid:gid:gecos:home:shell`).
#[derive(Debug, Clone)]
pub struct PasswdFile {
    path: PathBuf,
    /// Accounts below this uid are system accounts and are skipped.
    min_uid: u32,
}

impl PasswdFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            min_uid: 1000,
        }
    }

    pub fn with_min_uid(mut self, min_uid: u32) -> Self {
        self.min_uid = min_uid;
        self
    }
}

impl UserSource for PasswdFile {
    fn load_users(&self) -> Result<Vec<UserRecord>, UserError> {
        let contents = std::fs::read_to_string(&self.path).map_err(UserError::Load)?;
        Ok(parse_passwd(&contents, self.min_uid))
    }
}

/// Parses passwd-format `contents`, keeping interactive accounts with
/// uid >= `min_uid`. Malformed lines are skipped with a warning rather
/// than failing the whole roster.
pub fn parse_passwd(contents: &str, min_uid: u32) -> Vec<UserRecord> {
    let mut users = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() != 7 {
            tracing::warn!(entry = line, "skipping malformed passwd entry");
            continue;
        }
        let (name, uid, gecos, home, shell) =
            (fields[0], fields[2], fields[4], fields[5], fields[6]);

        let Ok(uid) = uid.parse::<u32>() else {
            tracing::warn!(entry = line, "skipping passwd entry with bad uid");
            continue;
        };
        if uid < min_uid || NOLOGIN_SHELLS.contains(&shell) {
            continue;
        }

        let mut user = UserRecord::new(name).with_home_directory(home);
        // GECOS: full name is the first comma-separated field.
        let real_name = gecos.split(',').next().unwrap_or("");
        if !real_name.is_empty() {
            user = user.with_real_name(real_name);
        }
        users.push(user);
    }
    users
}

// ---------------------------------------------------------------------------
// UserRoster
// ---------------------------------------------------------------------------

/// The cached user list, populated at most once from a [`UserSource`].
///
/// Explicit cache plus a single population guard: callers see the same
/// list for the roster's lifetime, and the source is consulted exactly
/// once however many times `populate` is called.
#[derive(Debug, Default)]
pub struct UserRoster {
    users: Vec<UserRecord>,
    populated: bool,
}

impl UserRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the roster from `source` unless it is already populated.
    pub fn populate(&mut self, source: &impl UserSource) -> Result<(), UserError> {
        if self.populated {
            return Ok(());
        }
        let users = source.load_users()?;
        tracing::info!(users = users.len(), "user roster populated");
        self.users = users;
        self.populated = true;
        Ok(())
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// The cached records, in source order. Empty until populated.
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn find(&self, name: &str) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.name() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut UserRecord> {
        self.users.iter_mut().find(|user| user.name() == name)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWD: &str = "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
alice:x:1000:1000:Alice Liddell,,,:/home/alice:/bin/bash
bob:x:1001:1001::/home/bob:/bin/zsh
backup:x:34:34:backup:/var/backups:/usr/sbin/nologin
svc:x:1002:1002:Service:/srv/svc:/usr/sbin/nologin
";

    #[test]
    fn test_parse_passwd_keeps_interactive_users_only() {
        let users = parse_passwd(PASSWD, 1000);
        let names: Vec<&str> = users.iter().map(|u| u.name()).collect();
        assert_eq!(names, ["alice", "bob"]);
    }

    #[test]
    fn test_parse_passwd_takes_real_name_from_gecos() {
        let users = parse_passwd(PASSWD, 1000);
        assert_eq!(users[0].display_name(), "Alice Liddell");
        // No GECOS → display name falls back to the username.
        assert_eq!(users[1].display_name(), "bob");
    }

    #[test]
    fn test_parse_passwd_skips_malformed_lines() {
        let users = parse_passwd("not-a-passwd-line\nalice:x:1000:1000::/h:/bin/sh\n", 1000);
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_parse_passwd_min_uid_zero_includes_root() {
        let users = parse_passwd(PASSWD, 0);
        assert_eq!(users[0].name(), "root");
    }

    /// A source that counts how often it is consulted.
    struct CountingSource(std::cell::Cell<usize>);

    impl UserSource for CountingSource {
        fn load_users(&self) -> Result<Vec<UserRecord>, UserError> {
            self.0.set(self.0.get() + 1);
            Ok(vec![UserRecord::new("alice")])
        }
    }

    #[test]
    fn test_roster_populates_exactly_once() {
        let source = CountingSource(std::cell::Cell::new(0));
        let mut roster = UserRoster::new();

        roster.populate(&source).unwrap();
        roster.populate(&source).unwrap();
        roster.populate(&source).unwrap();

        assert_eq!(source.0.get(), 1, "source consulted once");
        assert!(roster.is_populated());
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_roster_failed_population_can_be_retried() {
        struct FailingSource;
        impl UserSource for FailingSource {
            fn load_users(&self) -> Result<Vec<UserRecord>, UserError> {
                Err(UserError::Load(std::io::Error::other("disk on fire")))
            }
        }

        let mut roster = UserRoster::new();
        assert!(roster.populate(&FailingSource).is_err());
        assert!(!roster.is_populated(), "failed population leaves the guard unset");

        let source = CountingSource(std::cell::Cell::new(0));
        roster.populate(&source).unwrap();
        assert!(roster.is_populated());
    }

    #[test]
    fn test_roster_find() {
        let source = CountingSource(std::cell::Cell::new(0));
        let mut roster = UserRoster::new();
        roster.populate(&source).unwrap();

        assert!(roster.find("alice").is_some());
        assert!(roster.find("mallory").is_none());

        roster.find_mut("alice").unwrap().set_logged_in(true);
        assert!(roster.find("alice").unwrap().logged_in());
    }
}
