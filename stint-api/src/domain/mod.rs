mod entry;
mod manual;
mod summary;

pub use entry::*;
pub use manual::*;
pub use summary::*;
