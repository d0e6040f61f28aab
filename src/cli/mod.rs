pub mod account;
pub mod chart;
pub mod convert;
pub mod favorites;
pub mod history;
pub mod prices;
pub mod search;
pub mod setup;
pub mod ui;
