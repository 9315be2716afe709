use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};

use crate::abs_path::AbsPathBuf;
use crate::config::Config;
use crate::service::session::{follow_redirects, SendPretty as _};
use crate::{Console, Result};

/// A response after every redirection was followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub status: StatusCode,
    pub url: Url,
    pub body: String,
}

/// Requests against the remote site, sharing one cookie session.
pub trait Transport {
    fn get(&self, url: &Url, cnsl: &mut Console) -> Result<Fetched>;

    /// Posts a url-encoded form the way a browser submits it.
    fn post_form(&self, url: &Url, form: &[(&str, String)], cnsl: &mut Console)
        -> Result<Fetched>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    cookies_path: AbsPathBuf,
    redirect_limit: usize,
}

impl HttpTransport {
    pub fn new(client: Client, cookies_path: AbsPathBuf, redirect_limit: usize) -> Self {
        Self {
            client,
            cookies_path,
            redirect_limit,
        }
    }

    pub fn from_config(conf: &Config) -> Result<Self> {
        let session = conf.session();
        Ok(Self::new(
            conf.build_client()?,
            session.cookies_path().clone(),
            session.redirect_limit(),
        ))
    }

    fn finish(&self, res: reqwest::blocking::Response, cnsl: &mut Console) -> Result<Fetched> {
        let res = follow_redirects(
            res,
            &self.client,
            &self.cookies_path,
            self.redirect_limit,
            cnsl,
        )?;
        let status = res.status();
        let url = res.url().clone();
        let body = res.text()?;
        Ok(Fetched { status, url, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url, cnsl: &mut Console) -> Result<Fetched> {
        let res = self
            .client
            .get(url.clone())
            .send_pretty(&self.client, &self.cookies_path, cnsl)?;
        self.finish(res, cnsl)
    }

    fn post_form(
        &self,
        url: &Url,
        form: &[(&str, String)],
        cnsl: &mut Console,
    ) -> Result<Fetched> {
        let res = self
            .client
            .post(url.clone())
            .form(form)
            .send_pretty(&self.client, &self.cookies_path, cnsl)?;
        self.finish(res, cnsl)
    }
}
