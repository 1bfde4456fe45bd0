//! Script generation for third-party embedding.
//!
//! Everything a host page ever receives from us is produced here as text:
//!
//! - `widget` - the self-contained injection widget script, parameterized by
//!   bar id, owner id and base URL at generation time
//! - `snippet` - the one-line bootstrap a site owner pastes into their page
//!
//! Values are substituted as fixed constants in the emitted source; the
//! widget never reads ids from the host page's own state.

mod snippet;
mod widget;

pub use snippet::embed_snippet;
pub use widget::{error_script, js_escape, widget_script, CONSOLE_PREFIX};
