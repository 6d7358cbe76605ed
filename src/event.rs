//! Push event structures

/// Identity of the repository a push landed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Key of the owning project, used to build browsable links
    pub project_key: String,
    /// URL-safe repository identifier
    pub slug: String,
    /// Human readable name shown in notifications
    pub name: String,
}

impl Repository {
    pub fn new(
        project_key: impl Into<String>,
        slug: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            project_key: project_key.into(),
            slug: slug.into(),
            name: name.into(),
        }
    }
}

/// The user who performed the push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushUser {
    pub display_name: String,
    pub email: String,
}

/// One reference update within a push.
///
/// `from_hash` is the exclusive boundary and is absent when the ref was created.
/// `to_hash` is the inclusive boundary and is absent when the ref was deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefChange {
    pub ref_id: String,
    pub from_hash: Option<String>,
    pub to_hash: Option<String>,
}

impl RefChange {
    /// Builds a ref change, treating empty and null (all-zero) object ids as absent.
    pub fn new(ref_id: impl Into<String>, from: &str, to: &str) -> Self {
        Self {
            ref_id: ref_id.into(),
            from_hash: normalize_revision(from),
            to_hash: normalize_revision(to),
        }
    }

    /// Parses one `<old> <new> <ref>` line as fed to a `post-receive` hook.
    pub fn from_hook_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let from = parts.next()?;
        let to = parts.next()?;
        let ref_id = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(ref_id, from, to))
    }

    pub fn is_created(&self) -> bool {
        self.from_hash.is_none()
    }

    pub fn is_deleted(&self) -> bool {
        self.to_hash.is_none()
    }
}

fn normalize_revision(rev: &str) -> Option<String> {
    let rev = rev.trim();
    if rev.is_empty() || rev.chars().all(|c| c == '0') {
        None
    } else {
        Some(rev.to_string())
    }
}

/// A push event as delivered by the hosting side. Consumed once per pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    pub repository: Repository,
    pub user: Option<PushUser>,
    pub ref_changes: Vec<RefChange>,
}

/// A single commit returned by a history range query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: String,
    pub message: String,
}

impl Commit {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }
}
