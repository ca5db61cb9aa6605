mod client;
mod scope;
mod tracker_url;

pub mod domain;

pub use client::*;
pub use scope::*;
pub use tracker_url::*;
