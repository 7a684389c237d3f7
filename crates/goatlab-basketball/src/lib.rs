// Library root: basketball roster valuation, formula ranking and trades.

pub mod ingest;
pub mod player;
pub mod presets;
pub mod ranking;
pub mod roster;
pub mod selection;
pub mod stats;
pub mod trade;
pub mod valuation;
