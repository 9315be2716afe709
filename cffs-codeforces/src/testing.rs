use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use anyhow::anyhow;
use reqwest::{StatusCode, Url};

use crate::transport::{Fetched, Transport};
use crate::{Console, Result};

pub const SUBMIT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><script>
  var contestId = 1234;
  window.participantId = 98765;
</script></head>
<body>
<div class="lang-chooser">
  <a href="/profile/tourist">tourist</a> | <a href="/c0ffee/logout">Logout</a>
</div>
<form class="submit-form" method="post" action="?csrf_token=tok">
  <input type="hidden" name="csrf_token" value="csrf-abc"/>
  <input type="hidden" name="ftaa" value="ftaa-123"/>
  <input type="hidden" name="bfaa" value="bfaa-456"/>
  <input type="hidden" name="action" value="submitSolutionFormSubmitted"/>
  <select name="submittedProblemIndex">
    <option value="">Choose problem</option>
    <option value="A" data-time-limit="1" data-memory-limit="256">A - Way Too Long Words</option>
    <option value="B" data-time-limit="2" data-memory-limit="512"
            data-input-file="input.txt" data-output-file="output.txt">B - Files</option>
  </select>
  <select name="programTypeId">
    <option value="43">GNU GCC C11 5.1.0</option>
    <option value="54" selected="selected">GNU G++17 7.3.0</option>
    <option value="31">Python 3.8</option>
    <option value="75">Rust 1.75.0 (2021)</option>
  </select>
  <textarea name="source"></textarea>
</form>
</body>
</html>"#;

pub const LOADING_PAGE: &str = r#"<html><body>
<div class="lang-chooser"><a href="/c0ffee/logout">Logout</a></div>
<p>Please wait. Your browser is being checked.</p>
</body></html>"#;

pub const LOGGED_OUT_PAGE: &str = r#"<html><body>
<div class="lang-chooser"><a href="/enter">Enter</a> | <a href="/register">Register</a></div>
<div class="problem-statement">...</div>
</body></html>"#;

/// Replays canned responses and records every request.
pub struct ScriptedTransport {
    gets: RefCell<VecDeque<Result<String>>>,
    fallback_get: Option<String>,
    post_result: RefCell<Option<Result<Fetched>>>,
    get_count: Cell<usize>,
    posts: RefCell<Vec<(Url, Vec<(String, String)>)>>,
}

impl ScriptedTransport {
    pub fn new(gets: Vec<Result<String>>) -> Self {
        Self {
            gets: RefCell::new(gets.into_iter().collect()),
            fallback_get: None,
            post_result: RefCell::new(None),
            get_count: Cell::new(0),
            posts: RefCell::new(Vec::new()),
        }
    }

    /// Always answers GET requests with `body`.
    pub fn serving(body: &str) -> Self {
        let mut ret = Self::new(Vec::new());
        ret.fallback_get = Some(body.to_owned());
        ret
    }

    pub fn failing_post(self, err: anyhow::Error) -> Self {
        *self.post_result.borrow_mut() = Some(Err(err));
        self
    }

    pub fn get_count(&self) -> usize {
        self.get_count.get()
    }

    pub fn posts(&self) -> Vec<(Url, Vec<(String, String)>)> {
        self.posts.borrow().clone()
    }

    pub fn last_post_field(&self, name: &str) -> Option<String> {
        self.posts.borrow().last().and_then(|(_, form)| {
            form.iter()
                .find(|(key, _)| key == name)
                .map(|(_, val)| val.clone())
        })
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &Url, _cnsl: &mut Console) -> Result<Fetched> {
        self.get_count.set(self.get_count.get() + 1);
        let body = match self.gets.borrow_mut().pop_front() {
            Some(body) => body?,
            None => self
                .fallback_get
                .clone()
                .ok_or_else(|| anyhow!("No scripted response for {}", url))?,
        };
        Ok(Fetched {
            status: StatusCode::OK,
            url: url.clone(),
            body,
        })
    }

    fn post_form(
        &self,
        url: &Url,
        form: &[(&str, String)],
        _cnsl: &mut Console,
    ) -> Result<Fetched> {
        let form = form
            .iter()
            .map(|(key, val)| ((*key).to_owned(), val.clone()))
            .collect();
        self.posts.borrow_mut().push((url.clone(), form));
        match self.post_result.borrow_mut().take() {
            Some(result) => result,
            None => {
                let mut redirected = url.clone();
                redirected.set_path("/contest/1234/my");
                Ok(Fetched {
                    status: StatusCode::OK,
                    url: redirected,
                    body: String::new(),
                })
            }
        }
    }
}
