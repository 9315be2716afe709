use cffs_util::{regex, select};
use getset::Getters;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::model::{LangOption, ProblemOption};
use crate::service::scrape::Scrape;
use crate::transport::Transport;
use crate::{Console, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPageBuilder<'a> {
    endpoint: &'a Url,
}

impl<'a> SubmitPageBuilder<'a> {
    pub fn new(endpoint: &'a Url) -> Self {
        Self { endpoint }
    }

    pub fn build(self, transport: &dyn Transport, cnsl: &mut Console) -> Result<SubmitPage> {
        let fetched = transport.get(self.endpoint, cnsl)?;
        Ok(SubmitPage {
            content: Html::parse_document(&fetched.body),
            raw: fetched.body,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPage {
    content: Html,
    raw: String,
}

impl SubmitPage {
    #[cfg(test)]
    pub(crate) fn parse(raw: &str) -> Self {
        Self {
            content: Html::parse_document(raw),
            raw: raw.to_owned(),
        }
    }

    /// The submit form, or `None` while the remote page is not ready.
    pub fn extract_form(&self) -> Option<SubmitForm> {
        self.find_first(select!("form.submit-form"))
            .map(|form| SubmitForm::from_elem(&form))
    }

    pub fn extract_contest_id(&self) -> Option<String> {
        regex!(r"contestId\s*[=:]\s*(\d+)")
            .captures(&self.raw)
            .map(|caps| caps[1].to_owned())
    }

    pub fn extract_participant_id(&self) -> Option<String> {
        regex!(r"participantId\s*[=:]\s*(\d+)")
            .captures(&self.raw)
            .map(|caps| caps[1].to_owned())
    }
}

impl Scrape for SubmitPage {
    fn elem(&self) -> ElementRef {
        self.content.root_element()
    }
}

/// Opaque values the remote form requires, copied verbatim.
#[derive(Serialize, Getters, Debug, Clone, PartialEq, Eq, Hash)]
#[get = "pub"]
pub struct AuthTokens {
    csrf_token: String,
    ftaa: String,
    bfaa: String,
    action: String,
}

impl AuthTokens {
    pub const DEFAULT_ACTION: &'static str = "submitSolutionFormSubmitted";

    pub fn new(
        csrf_token: impl Into<String>,
        ftaa: impl Into<String>,
        bfaa: impl Into<String>,
        action: Option<String>,
    ) -> Self {
        Self {
            csrf_token: csrf_token.into(),
            ftaa: ftaa.into(),
            bfaa: bfaa.into(),
            action: action
                .filter(|action| !action.is_empty())
                .unwrap_or_else(|| Self::DEFAULT_ACTION.to_owned()),
        }
    }

    pub(crate) fn set_ftaa(&mut self, ftaa: String) {
        self.ftaa = ftaa;
    }

    pub(crate) fn set_bfaa(&mut self, bfaa: String) {
        self.bfaa = bfaa;
    }
}

#[derive(Serialize, Getters, Debug, Clone, PartialEq, Eq, Hash)]
#[get = "pub"]
pub struct SubmitForm {
    tokens: AuthTokens,
    lang_options: Vec<LangOption>,
    problem_options: Vec<ProblemOption>,
}

impl SubmitForm {
    fn from_elem(form: &ElementRef) -> Self {
        let input_value = |selector: &Selector| form.find_attr(selector, "value");
        let tokens = AuthTokens::new(
            input_value(select!("input[name=\"csrf_token\"]")).unwrap_or_default(),
            input_value(select!("input[name=\"ftaa\"]")).unwrap_or_default(),
            input_value(select!("input[name=\"bfaa\"]")).unwrap_or_default(),
            input_value(select!("input[name=\"action\"]")),
        );

        let lang_options = form
            .select(select!("select[name=\"programTypeId\"] option"))
            .map(|opt| {
                let text = opt.inner_text().trim().to_owned();
                LangOption {
                    value: option_value(&opt, &text),
                    selected: opt.value().attr("selected").is_some(),
                    text,
                }
            })
            .collect();

        let problem_options = form
            .select(select!("select[name=\"submittedProblemIndex\"] option"))
            .map(|opt| {
                let text = opt.inner_text().trim().to_owned();
                let data = |name: &str| opt.value().attr(name).map(ToOwned::to_owned);
                ProblemOption {
                    value: option_value(&opt, &text),
                    time_limit: data("data-time-limit"),
                    memory_limit: data("data-memory-limit"),
                    input_file: data("data-input-file"),
                    output_file: data("data-output-file"),
                    text,
                }
            })
            .collect();

        Self {
            tokens,
            lang_options,
            problem_options,
        }
    }

    pub(crate) fn into_parts(self) -> (AuthTokens, Vec<LangOption>, Vec<ProblemOption>) {
        (self.tokens, self.lang_options, self.problem_options)
    }
}

// an option without a value attribute submits its text
fn option_value(opt: &ElementRef, text: &str) -> String {
    opt.value()
        .attr("value")
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| text.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{LOADING_PAGE, SUBMIT_PAGE};

    #[test]
    fn extract_form() {
        let page = SubmitPage::parse(SUBMIT_PAGE);
        let form = page.extract_form().unwrap();

        assert_eq!(form.tokens().csrf_token(), "csrf-abc");
        assert_eq!(form.tokens().ftaa(), "ftaa-123");
        assert_eq!(form.tokens().bfaa(), "bfaa-456");
        assert_eq!(form.tokens().action(), "submitSolutionFormSubmitted");

        let lang_values: Vec<_> = form.lang_options().iter().map(|o| &o.value).collect();
        assert_eq!(lang_values, vec!["43", "54", "31", "75"]);
        assert_eq!(form.lang_options()[1].text, "GNU G++17 7.3.0");
        assert!(form.lang_options()[1].selected);
        assert!(!form.lang_options()[0].selected);

        let problems = form.problem_options();
        assert_eq!(problems.len(), 3);
        assert_eq!(problems[1].value, "A");
        assert_eq!(problems[1].time_limit.as_deref(), Some("1"));
        assert_eq!(problems[1].memory_limit.as_deref(), Some("256"));
        assert_eq!(problems[1].input_file, None);
        assert_eq!(problems[2].input_file.as_deref(), Some("input.txt"));
        assert_eq!(problems[2].output_file.as_deref(), Some("output.txt"));
    }

    #[test]
    fn extract_ids_from_markup() {
        let page = SubmitPage::parse(SUBMIT_PAGE);
        assert_eq!(page.extract_contest_id(), Some("1234".to_owned()));
        assert_eq!(page.extract_participant_id(), Some("98765".to_owned()));

        let page = SubmitPage::parse("var config = {contestId: 42};");
        assert_eq!(page.extract_contest_id(), Some("42".to_owned()));
        assert_eq!(page.extract_participant_id(), None);
    }

    #[test]
    fn missing_form_and_missing_tokens() {
        assert_eq!(SubmitPage::parse(LOADING_PAGE).extract_form(), None);

        let page = SubmitPage::parse(
            r#"<form class="submit-form"><input name="csrf_token" value="x"/></form>"#,
        );
        let form = page.extract_form().unwrap();
        assert_eq!(form.tokens().csrf_token(), "x");
        assert_eq!(form.tokens().ftaa(), "");
        assert_eq!(form.tokens().bfaa(), "");
        assert_eq!(form.tokens().action(), AuthTokens::DEFAULT_ACTION);
        assert!(form.lang_options().is_empty());
        assert!(form.problem_options().is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let first = SubmitPage::parse(SUBMIT_PAGE).extract_form();
        let second = SubmitPage::parse(SUBMIT_PAGE).extract_form();
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
