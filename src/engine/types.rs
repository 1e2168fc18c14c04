// src/engine/types.rs
use std::fmt;
use std::str::FromStr;

use crate::config::consts::{CHS_ID_SEP, DB_FILE_EXT, DB_FILE_PREFIX};

/// Language edition a document comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    /// Japanese official card site (HTML)
    Jp,
    /// Traditional Chinese official card site (HTML)
    Cht,
    /// Simplified Chinese card API (JSON)
    Chs,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Jp, Source::Cht, Source::Chs];

    pub fn key(&self) -> &'static str {
        match self {
            Source::Jp => "jp",
            Source::Cht => "cht",
            Source::Chs => "chs",
        }
    }

    pub fn is_html(&self) -> bool {
        !matches!(self, Source::Chs)
    }

    pub fn database_file(&self) -> String {
        format!("{DB_FILE_PREFIX}{}.{DB_FILE_EXT}", self.key())
    }

    /// Store key for a card identifier. API ids come as `SET/NUM` and are kept as `SET-NUM`.
    pub fn key_for(&self, card_id: &str) -> String {
        let id = card_id.trim();
        match self {
            Source::Chs => id.replace('/', &CHS_ID_SEP.to_string()),
            _ => s!(id),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source `{0}` (expected jp, cht or chs)")]
pub struct UnknownSource(pub String);

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jp" | "ja" => Ok(Source::Jp),
            "cht" | "tw" => Ok(Source::Cht),
            "chs" | "cn" => Ok(Source::Chs),
            other => Err(UnknownSource(s!(other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_case_insensitively() {
        assert_eq!("JP".parse::<Source>(), Ok(Source::Jp));
        assert_eq!(" cht ".parse::<Source>(), Ok(Source::Cht));
        assert!("kr".parse::<Source>().is_err());
    }

    #[test]
    fn api_keys_use_dash() {
        assert_eq!(Source::Chs.key_for("CSV5C/012"), "CSV5C-012");
        assert_eq!(Source::Chs.key_for("CSV5C-012"), "CSV5C-012");
        assert_eq!(Source::Jp.key_for(" 46011 "), "46011");
    }

    #[test]
    fn database_file_names() {
        assert_eq!(Source::Jp.database_file(), "database_jp.json");
        assert_eq!(Source::Chs.to_string(), "chs");
    }
}
