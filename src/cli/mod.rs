//! Terminal front end over the pricing core

pub mod compare;
pub mod currencies;
pub mod quote;
pub mod setup;
pub mod tiers;
pub mod ui;
