pub mod asset;
pub mod item;
pub mod player;
pub mod provider;
