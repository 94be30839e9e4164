use std::fmt;

use serde::{Deserialize, Serialize};

/// The logical document collections the service persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Emotion-sentiment scores.
    Sentiments,
    /// Location fixes.
    Gps,
    /// Video log metadata.
    Vlogs,
}

impl Collection {
    /// All collections, in a stable order.
    pub const ALL: [Self; 3] = [Self::Sentiments, Self::Gps, Self::Vlogs];

    /// Name used by storage backends.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sentiments => "sentiments",
            Self::Gps => "gps",
            Self::Vlogs => "vlogs",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
