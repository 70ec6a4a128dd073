use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The entity kinds managed by the admin screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Author,
    Book,
    Publisher,
    Store,
}

impl EntityKind {
    /// Every kind, in routing-table order.
    pub const ALL: [EntityKind; 4] = [Self::Book, Self::Author, Self::Store, Self::Publisher];

    /// Lower-case singular name, also the route segment of the entity screens.
    #[must_use]
    pub const fn route_path(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Book => "book",
            Self::Publisher => "publisher",
            Self::Store => "store",
        }
    }

    /// Collection path of the REST resource (`/api/{path}`).
    #[must_use]
    pub const fn api_path(self) -> &'static str {
        match self {
            Self::Author => "authors",
            Self::Book => "books",
            Self::Publisher => "publishers",
            Self::Store => "stores",
        }
    }

    /// Title shown on the entity's list page.
    #[must_use]
    pub const fn page_title(self) -> &'static str {
        match self {
            Self::Author => "Authors",
            Self::Book => "Books",
            Self::Publisher => "Publishers",
            Self::Store => "Stores",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route_path())
    }
}

impl FromStr for EntityKind {
    type Err = crate::Error;

    /// Accepts the route segment or the API collection path, case-insensitively.
    fn from_str(s: &str) -> crate::Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.route_path() == needle || kind.api_path() == needle)
            .ok_or_else(|| crate::Error::UnknownEntityKind(s.to_string()))
    }
}
