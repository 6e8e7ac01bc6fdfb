use std::io;

use tracing::debug;
use url::Url;

/// Opens web pages on behalf of the detail screen.
pub trait Browser {
    fn open(&self, url: &Url) -> io::Result<()>;
}

/// The user's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &Url) -> io::Result<()> {
        webbrowser::open(url.as_str())
    }
}

/// Opens `raw` when it is an absolute http(s) URL. Anything else is ignored
/// and reported as `Ok(false)`.
pub fn visit(browser: &dyn Browser, raw: &str) -> io::Result<bool> {
    let url = match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        _ => {
            debug!("not opening {:?}: not a web URL", raw);
            return Ok(false);
        }
    };
    browser.open(&url)?;
    Ok(true)
}
