use anyhow::Context as _;
use reqwest::Url;
use scraper::{ElementRef, Html};

use crate::page::HasHeader;
use crate::service::scrape::Scrape;
use crate::transport::Transport;
use crate::{Console, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterPageBuilder<'a> {
    base_url: &'a Url,
}

impl<'a> EnterPageBuilder<'a> {
    const PATH: &'static str = "/enter";

    pub fn new(base_url: &'a Url) -> Self {
        Self { base_url }
    }

    pub fn url(&self) -> Result<Url> {
        self.base_url
            .join(Self::PATH)
            .with_context(|| format!("Could not parse url path: {}", Self::PATH))
    }

    pub fn build(self, transport: &dyn Transport, cnsl: &mut Console) -> Result<EnterPage> {
        let url = self.url()?;
        let fetched = transport.get(&url, cnsl)?;
        Ok(EnterPage {
            url,
            content: Html::parse_document(&fetched.body),
        })
    }
}

/// The login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterPage {
    url: Url,
    content: Html,
}

impl EnterPage {
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Scrape for EnterPage {
    fn elem(&self) -> ElementRef {
        self.content.root_element()
    }
}

impl HasHeader for EnterPage {}
