//! A single user record and its lazily-fetched defaults.

use std::path::PathBuf;

// ---------------------------------------------------------------------------
// UserDefaults
// ---------------------------------------------------------------------------

/// Per-user preferences the greeter preselects. Any field may be absent,
/// meaning "use the system default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDefaults {
    pub language: Option<String>,
    pub layout: Option<String>,
    pub session: Option<String>,
}

/// Supplies per-user defaults, typically from accountsservice or a
/// settings store. Looked up lazily, once per user.
pub trait DefaultsSource {
    /// Returns the stored defaults for `username`, or `None` if the store
    /// has no entry (yet), in which case the lookup will be retried on
    /// the next access.
    fn user_defaults(&self, username: &str) -> Option<UserDefaults>;
}

// ---------------------------------------------------------------------------
// UserRecord
// ---------------------------------------------------------------------------

/// One user the greeter can offer for login. Plain property storage.
#[derive(Debug, Clone)]
pub struct UserRecord {
    name: String,
    real_name: Option<String>,
    home_directory: Option<PathBuf>,
    image: Option<PathBuf>,
    logged_in: bool,
    defaults: UserDefaults,
    have_defaults: bool,
}

impl UserRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            real_name: None,
            home_directory: None,
            image: None,
            logged_in: false,
            defaults: UserDefaults::default(),
            have_defaults: false,
        }
    }

    pub fn with_real_name(mut self, real_name: impl Into<String>) -> Self {
        self.real_name = Some(real_name.into());
        self
    }

    pub fn with_home_directory(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_directory = Some(home.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<PathBuf>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn real_name(&self) -> Option<&str> {
        self.real_name.as_deref()
    }

    /// The name the greeter shows: the real name when one is known,
    /// otherwise the username.
    pub fn display_name(&self) -> &str {
        match self.real_name.as_deref() {
            Some(real_name) if !real_name.is_empty() => real_name,
            _ => &self.name,
        }
    }

    pub fn home_directory(&self) -> Option<&std::path::Path> {
        self.home_directory.as_deref()
    }

    pub fn image(&self) -> Option<&std::path::Path> {
        self.image.as_deref()
    }

    pub fn logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn set_logged_in(&mut self, logged_in: bool) {
        self.logged_in = logged_in;
    }

    /// The user's stored language, fetching defaults on first use.
    pub fn language(&mut self, source: &impl DefaultsSource) -> Option<&str> {
        self.fetch_defaults(source);
        self.defaults.language.as_deref()
    }

    /// The user's stored keyboard layout, fetching defaults on first use.
    pub fn layout(&mut self, source: &impl DefaultsSource) -> Option<&str> {
        self.fetch_defaults(source);
        self.defaults.layout.as_deref()
    }

    /// The user's stored session, fetching defaults on first use.
    pub fn session(&mut self, source: &impl DefaultsSource) -> Option<&str> {
        self.fetch_defaults(source);
        self.defaults.session.as_deref()
    }

    /// Populates the defaults cache at most once. A source with no entry
    /// leaves the guard unset so a later access can retry.
    fn fetch_defaults(&mut self, source: &impl DefaultsSource) {
        if self.have_defaults {
            return;
        }
        if let Some(defaults) = source.user_defaults(&self.name) {
            self.defaults = defaults;
            self.have_defaults = true;
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
