//! Fetched page handle.

use scraper::{Html, Selector};
use url::Url;

use crate::utils::charset::decode_html;
use crate::utils::{join_text, resolve_url};

/// A fetched document: its URL, raw bytes and parsed tree.
///
/// Read-only. Built by the fetcher for the duration of one handler call.
pub struct Page {
    url: String,
    base: Option<Url>,
    body: Vec<u8>,
    document: Html,
}

/// A hyperlink found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Visible text, whitespace-normalized
    pub text: String,

    /// Target resolved against the page URL
    pub href: Option<String>,
}

impl Page {
    /// Parse `body` as an HTML document fetched from `url`.
    ///
    /// The charset comes from a byte-order mark or a `<meta>` declaration,
    /// falling back to UTF-8.
    pub fn new(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::with_charset(url, body, None)
    }

    /// Like `new`, with the charset declared by the response headers.
    pub fn with_charset(
        url: impl Into<String>,
        body: impl Into<Vec<u8>>,
        charset: Option<&str>,
    ) -> Self {
        let url = url.into();
        let body = body.into();
        let document = Html::parse_document(&decode_html(&body, charset));
        let base = Url::parse(&url).ok();
        Self {
            url,
            base,
            body,
            document,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The bytes as fetched, before any decoding.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Hex MD5 digest of the raw bytes. Independent of the URL.
    pub fn fingerprint(&self) -> String {
        format!("{:x}", md5::compute(self.body()))
    }

    /// Text of every element matched by `selector`, one entry per element.
    ///
    /// Each entry joins all descendant text nodes, since labels are often
    /// split across inline markup.
    pub fn select_texts(&self, selector: &Selector) -> Vec<String> {
        self.document
            .select(selector)
            .map(|element| join_text(element.text()))
            .collect()
    }

    /// Text of all elements matched by `selector`, joined into one string.
    pub fn select_text(&self, selector: &Selector) -> String {
        join_text(self.document.select(selector).flat_map(|element| element.text()))
    }

    /// Values of `attr` on every element matched by `selector`.
    pub fn select_attrs(&self, selector: &Selector, attr: &str) -> Vec<String> {
        self.document
            .select(selector)
            .filter_map(|element| element.value().attr(attr))
            .map(|value| value.trim().to_string())
            .collect()
    }

    /// Anchors matched by `selector`, with their targets resolved.
    pub fn anchors(&self, selector: &Selector) -> Vec<Anchor> {
        self.document
            .select(selector)
            .map(|element| Anchor {
                text: join_text(element.text()),
                href: element.value().attr("href").map(|href| self.resolve(href)),
            })
            .collect()
    }

    /// Resolve a link target against this page's URL.
    pub fn resolve(&self, href: &str) -> String {
        match &self.base {
            Some(base) => resolve_url(base, href.trim()),
            None => href.trim().to_string(),
        }
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.url)
            .field("bytes", &self.body.len())
            .finish()
    }
}
