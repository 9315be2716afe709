use anyhow::Context as _;
use scraper::{ElementRef, Html, Selector};

use crate::select;
use crate::{Error, Result};

pub trait Scrape {
    fn elem(&self) -> ElementRef;

    fn find_first(&self, selector: &Selector) -> Option<ElementRef> {
        self.elem().select(selector).next()
    }

    fn inner_text(&self) -> String {
        self.elem().text().fold(String::new(), |mut ret, s| {
            ret.push_str(s);
            ret
        })
    }

    /// Value of `attr` on the first element matching `selector`.
    fn find_attr(&self, selector: &Selector, attr: &str) -> Option<String> {
        self.find_first(selector)
            .and_then(|elem| elem.value().attr(attr))
            .map(ToOwned::to_owned)
    }
}

impl Scrape for ElementRef<'_> {
    fn elem(&self) -> ElementRef {
        *self
    }
}

impl Scrape for Html {
    fn elem(&self) -> ElementRef {
        self.root_element()
    }
}

pub trait ExtractCsrfToken: Scrape {
    fn extract_csrf_token(&self) -> Result<String> {
        let token = self
            .find_first(select!("[name=\"csrf_token\"]"))
            .context("Could not extract csrf token")?
            .value()
            .attr("value")
            .context("Could not find csrf_token value attr")?
            .to_owned();
        if token.is_empty() {
            Err(Error::msg("Found empty csrf token"))
        } else {
            Ok(token)
        }
    }
}

impl<T: Scrape> ExtractCsrfToken for T {}
