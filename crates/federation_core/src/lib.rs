mod bundle;
pub use bundle::*;
mod css;
pub use css::*;
mod error;
pub use error::*;
pub mod exposes;
mod federation;
pub use federation::*;
mod markers;
pub use markers::*;
mod options;
pub use options::*;
mod plugin;
pub use plugin::*;
mod rewriter;
pub use rewriter::*;
mod session;
pub use session::*;
pub mod shared;
mod shim;
pub use shim::*;
mod utils;
pub use utils::*;
mod visitors;
pub(crate) use visitors::*;
