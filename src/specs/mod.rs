// src/specs/mod.rs
//! # Card source “specs” module
//!
//! This module hosts the **per-source extraction specifications**. Each spec knows
//! one source's document layout: *where the ground truth lives* and *how to read
//! it robustly* into a [`crate::card::CanonicalCard`].
//!
//! ## What lives here
//! - **Layout knowledge** for every source: the Japanese card pages (`jp`), the
//!   Traditional Chinese card pages (`cht`) and the Simplified Chinese card API
//!   (`chs`), plus the deck list readers (`deck`).
//! - **Per-source tables**: layout fingerprints, category headings, subtype
//!   suffixes, rarity icons. Icon and rule tables live in `engine` and are
//!   injected through each spec struct, so tests can swap them.
//! - **Tolerant extraction**: a missing optional element leaves its field empty.
//!   Only an unrecognized layout, a nameless card or a broken payload fails.
//!
//! ## What does **not** live here
//! - **Fetching** documents (`scrape::fetch`) or **persisting** records (`store`).
//! - **Overwrite policy** and batch bookkeeping (`scrape::process`).
//! - Source-independent logic: classification precedence, rule inference,
//!   evolution chains and icon lookup all live in `engine`.
//!
//! ## Typical call chain
//! ```text
//! cli / caller → scrape::process → Pipeline::parse(source, doc, id)
//!                                    ↘ specs::<source>::parse(root)
//!                                        ↘ engine::{dispatch, classify, icons, rules, evolution}
//!                store::CardStore::save (outside of specs)
//! ```
//!
//! ## Conventions & invariants
//! - HTML specs are generic over [`crate::core::html::Node`]; they never touch
//!   `scraper` types directly.
//! - Abilities and attacks keep **document order**.
//! - Icon tokens go through the source's own table; unknown tokens stay visible
//!   as `[token]`.
//! - Logs are for tolerated failures (unresolvable evolution chains, odd
//!   weakness rows) and layout selection, nothing per field.
//!
//! ## Testing notes
//! - Specs are tested **offline** against saved pages and payloads under
//!   `tests/fixtures/`.
//!
//! In short: **`specs` knows how to read the sources.** Other layers decide what
//! to read, whether to overwrite, and where it is stored.
pub mod chs;
pub mod cht;
pub mod deck;
pub mod jp;
