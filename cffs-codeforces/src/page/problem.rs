use cffs_util::select;
use reqwest::Url;
use scraper::{ElementRef, Html};

use crate::page::HasHeader;
use crate::service::scrape::Scrape;
use crate::transport::Transport;
use crate::{Console, Result};

/// The problem page the submission panel is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemPageBuilder<'a> {
    url: &'a Url,
}

impl<'a> ProblemPageBuilder<'a> {
    pub fn new(url: &'a Url) -> Self {
        Self { url }
    }

    pub fn build(self, transport: &dyn Transport, cnsl: &mut Console) -> Result<ProblemPage> {
        let fetched = transport.get(self.url, cnsl)?;
        Ok(ProblemPage {
            content: Html::parse_document(&fetched.body),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemPage {
    content: Html,
}

impl ProblemPage {
    pub fn has_statement(&self) -> bool {
        self.find_first(select!(".problem-statement")).is_some()
    }
}

impl Scrape for ProblemPage {
    fn elem(&self) -> ElementRef {
        self.content.root_element()
    }
}

impl HasHeader for ProblemPage {}
