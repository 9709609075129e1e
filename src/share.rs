//! Copy-to-clipboard affordance for share links.
//!
//! Thin layer over the core: it composes the fully-qualified URL for a
//! link's current state - the freshly composed token substituted as the
//! fragment, every other table's token preserved - and tries to put it on
//! the system clipboard via the OSC 52 escape sequence.
//!
//! Clipboard access can fail (not every terminal or host permits OSC 52
//! writes), and that is not an error of the core: callers fall back to
//! presenting the returned URL as selectable text.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fraglink::config::LinkConfig;
//! use fraglink::fragment::{FragmentGateway, MemoryLocation};
//! use fraglink::link::StateLink;
//! use fraglink::share::share_url;
//! use fraglink::table::TableView;
//! use fraglink::testing::StubTable;
//!
//! let gateway = FragmentGateway::new(Arc::new(MemoryLocation::default()));
//! let table = Arc::new(StubTable::new("orders"));
//! let link = StateLink::bind(table.clone(), gateway, LinkConfig::default()).unwrap();
//!
//! table.set_page(2);
//! let url = share_url("https://example.com/report", &link);
//! assert_eq!(url, "https://example.com/report#orders=p2");
//! ```

use crate::link::StateLink;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::io::{self, Write};

/// Compose the share URL for a link's current state.
///
/// Any fragment already present on `base_url` is replaced. The fragment is
/// built by the gateway's merge-preserving preview, so tokens of other
/// tables sharing the page survive verbatim.
pub fn share_url(base_url: &str, link: &StateLink) -> String {
    let base = base_url.split('#').next().unwrap_or(base_url);
    let token = link.compose_token();
    let fragment = link.gateway().preview(&link.table().id(), &token);
    format!("{base}#{fragment}")
}

/// Compose the share URL and try to copy it to the system clipboard.
///
/// Returns the URL either way; an `Err` carries it together with the
/// clipboard failure so the caller can fall back to showing the text.
pub fn copy_share_url(base_url: &str, link: &StateLink) -> Result<String, (String, io::Error)> {
    let url = share_url(base_url, link);
    match copy_to_clipboard(&url) {
        Ok(()) => Ok(url),
        Err(err) => Err((url, err)),
    }
}

/// Copy text to the system clipboard via OSC 52.
///
/// Works in most modern terminals; some restrict or disable OSC 52 for
/// security reasons, in which case the write appears to succeed but the
/// clipboard is untouched - the selectable-text fallback covers that too.
///
/// # Errors
///
/// Returns an error if writing the escape sequence to stdout fails.
pub fn copy_to_clipboard(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(osc52_sequence(text).as_bytes())?;
    stdout.flush()
}

/// Build the OSC 52 clipboard-set sequence for the given text.
fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", BASE64.encode(text))
}
