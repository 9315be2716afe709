use std::io::Write as _;

use anyhow::{anyhow, Context as _};
use reqwest::blocking::{Client, Request, RequestBuilder, Response};

use crate::abs_path::AbsPathBuf;
use crate::service::{CookieStorage, ResponseExt as _};
use crate::{Console, Error, Result};

trait ExecSession {
    fn exec_session(&self, request: Request, cookies_path: &AbsPathBuf) -> Result<Response>;
}

impl ExecSession for Client {
    fn exec_session(&self, mut request: Request, cookies_path: &AbsPathBuf) -> Result<Response> {
        let mut storage =
            CookieStorage::open(cookies_path).context("Could not open cookie storage")?;
        storage
            .load_into(&mut request)
            .context("Could not load cookies into request")?;
        let response = self.execute(request)?;
        storage
            .store_from(&response)
            .context("Could not store cookies from response")?;
        Ok(response)
    }
}

/// Sends a request through the cookie session, printing one progress line per request.
pub trait SendPretty {
    fn send_pretty(
        self,
        client: &Client,
        cookies_path: &AbsPathBuf,
        cnsl: &mut Console,
    ) -> Result<Response>;
}

impl SendPretty for RequestBuilder {
    fn send_pretty(
        self,
        client: &Client,
        cookies_path: &AbsPathBuf,
        cnsl: &mut Console,
    ) -> Result<Response> {
        let req = self
            .build()
            .map_err(|err| Error::new(err).context("Could not build request"))?;
        write!(cnsl, "{:7} {} ... ", req.method().as_str(), req.url()).unwrap_or(());
        let result = client
            .exec_session(req, cookies_path)
            .context("Could not send request");
        match &result {
            Ok(res) => writeln!(cnsl, "{}", res.status()),
            Err(_) => writeln!(cnsl, "failed"),
        }
        .unwrap_or(());
        result
    }
}

/// Follows redirections by hand so that every hop passes through the cookie session.
pub fn follow_redirects(
    mut res: Response,
    client: &Client,
    cookies_path: &AbsPathBuf,
    limit: usize,
    cnsl: &mut Console,
) -> Result<Response> {
    for _ in 0..limit {
        if !res.status().is_redirection() {
            return Ok(res);
        }
        let next = res.location_url(res.url())?;
        res = client.get(next).send_pretty(client, cookies_path, cnsl)?;
    }
    if res.status().is_redirection() {
        Err(anyhow!("Stopped after {} redirections", limit))
    } else {
        Ok(res)
    }
}
