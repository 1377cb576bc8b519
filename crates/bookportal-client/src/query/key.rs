//! Hierarchical cache keys.
//!
//! A key is an ordered list of segments, broadest first:
//! `[books]` ⊃ `[books, list]` ⊃ `[books, list, {page=2, title=Dune}]`.
//! Invalidating a key invalidates every key it is a prefix of.

use std::fmt;

use bookportal_core::ListFilter;

/// Resource family, always the first segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    Books,
    Feedback,
    Users,
    Auth,
    Stats,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Feedback => "feedback",
            Self::Users => "users",
            Self::Auth => "auth",
            Self::Stats => "stats",
        }
    }
}

/// Kind of read within a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    List,
    Detail,
    ByBook,
    Mine,
    Stats,
    Profile,
    Dashboard,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail => "detail",
            Self::ByBook => "byBook",
            Self::Mine => "mine",
            Self::Stats => "stats",
            Self::Profile => "profile",
            Self::Dashboard => "dashboard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeySegment {
    Family(Family),
    Tag(Tag),
    Id(i64),
    /// Filter object in canonical form; equal filters give equal segments.
    Filter(Vec<(String, String)>),
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Family(family) => f.write_str(family.as_str()),
            Self::Tag(tag) => f.write_str(tag.as_str()),
            Self::Id(id) => write!(f, "{id}"),
            Self::Filter(pairs) => {
                f.write_str("{")?;
                for (i, (name, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}={value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<KeySegment>);

impl QueryKey {
    pub fn family(family: Family) -> Self {
        Self(vec![KeySegment::Family(family)])
    }

    #[must_use]
    pub fn tag(mut self, tag: Tag) -> Self {
        self.0.push(KeySegment::Tag(tag));
        self
    }

    #[must_use]
    pub fn id(mut self, id: i64) -> Self {
        self.0.push(KeySegment::Id(id));
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: &impl ListFilter) -> Self {
        self.0.push(KeySegment::Filter(filter.canonical()));
        self
    }

    pub fn segments(&self) -> &[KeySegment] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Aggregate reads (`[stats, ..]` or any key tagged `stats`) use the longer
    /// staleness window.
    pub fn is_aggregate(&self) -> bool {
        self.0.iter().any(|s| {
            matches!(
                s,
                KeySegment::Family(Family::Stats) | KeySegment::Tag(Tag::Stats)
            )
        })
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{segment}")?;
        }
        f.write_str("]")
    }
}
