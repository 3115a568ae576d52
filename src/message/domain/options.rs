//! Options controlling a single message mutation.

/// Values that are treated as absent and never stored.
pub const ABSENT_VALUES: [&str; 3] = ["", "-", "N/A"];

/// Options for [`Message::add_with`](super::Message::add_with) and
/// [`Message::update_with`](super::Message::update_with).
///
/// # Examples
///
/// ```
/// use intelmsg::message::domain::AddOptions;
///
/// let options = AddOptions::new().sanitize().ignore(["unknown"]);
/// assert!(options.is_sanitize());
/// assert!(!options.is_force());
/// assert!(options.is_ignored("unknown"));
/// assert!(options.is_ignored("N/A"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOptions {
    sanitize: bool,
    force: bool,
    ignore: Vec<String>,
}

impl AddOptions {
    /// Creates options that validate without sanitizing and refuse to overwrite.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sanitize: false,
            force: false,
            ignore: Vec::new(),
        }
    }

    /// Runs the key's sanitizer before validation.
    #[must_use]
    pub const fn sanitize(mut self) -> Self {
        self.sanitize = true;
        self
    }

    /// Allows overwriting an existing value.
    #[must_use]
    pub const fn force(mut self) -> Self {
        self.force = true;
        self
    }

    /// Adds caller-supplied values to absorb as no-ops.
    #[must_use]
    pub fn ignore<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(values.into_iter().map(Into::into));
        self
    }

    /// Returns `true` if sanitizing was requested.
    #[must_use]
    pub const fn is_sanitize(&self) -> bool {
        self.sanitize
    }

    /// Returns `true` if overwriting was requested.
    #[must_use]
    pub const fn is_force(&self) -> bool {
        self.force
    }

    /// Returns the caller-supplied ignore values.
    #[must_use]
    pub fn ignored(&self) -> &[String] {
        &self.ignore
    }

    /// Returns `true` if `value` must be absorbed without storing anything.
    #[must_use]
    pub fn is_ignored(&self, value: &str) -> bool {
        ABSENT_VALUES.contains(&value) || self.ignore.iter().any(|ignored| ignored == value)
    }
}
