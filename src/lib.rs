//! Grow Calculator
//!
//! Deterministic estimation engines for indoor grow planning. Every engine is
//! a pure function over plain input structs; nothing is cached or shared
//! between calls.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`yields`] | Limiting-factor yield prediction (light, space, roots) |
//! | [`energy`] | Per-device, per-phase electricity use and cost |
//! | [`extraction`] | Flower rosin and fresh-frozen hash/rosin yields |
//! | [`recommender`] | Target harvest to minimum watts, area and equipment tier |
//! | [`calculator`] | Combined plan and text summaries |
//! | [`config`] | Calibration knobs, cycle timeline, default loadout, TOML file |
//! | [`parse`] | Mass and device spec parsing for the CLI |

pub mod calculator;
pub mod config;
pub mod energy;
pub mod error;
pub mod extraction;
pub mod models;
pub mod parse;
pub mod recommender;
pub mod yields;

pub use error::{CalcError, Result};
