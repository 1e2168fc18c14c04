// src/config/consts.rs

// Local store
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = ".store/debug.log";
pub const DB_FILE_PREFIX: &str = "database_";
pub const DB_FILE_EXT: &str = "json";
pub const TMP_SUFFIX: &str = ".tmp";
pub const JSON_INDENT: &[u8] = b"    ";

// Set list for the API source
pub const CARD_PACKS_FILE: &str = "card_packs.json";

// Site origins
pub const JP_ORIGIN: &str = "https://www.pokemon-card.com";
pub const CHS_IMAGE_BASE: &str = "https://tcg.mik.moe/static/img";

// Saved documents
pub const DOC_EXTS: &[&str] = &["html", "htm", "json"];
pub const DECK_FILE_PREFIX: &str = "deck_";

// Identifiers
pub const CHS_ID_SEP: char = '-';
pub const DECK_CODE_MIN_LEN: usize = 11;
