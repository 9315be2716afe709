use std::fmt;

use crate::editor::{extension_hint, Editor as _, EditorAdapter};
use crate::mirror::SourceMirror;
use crate::model::{LangId, LangIdRef, LangOption, ProblemOption};
use crate::page::{AuthTokens, SubmitForm};
use crate::submit::SubmitState;
use crate::target::Target;

/// The submit button.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trigger {
    enabled: bool,
    label: &'static str,
}

impl Trigger {
    pub const LABEL: &'static str = "Submit";
    pub const BUSY_LABEL: &'static str = "Submitting...";

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub(crate) fn disable(&mut self) {
        self.enabled = false;
        self.label = Self::BUSY_LABEL;
    }

    pub(crate) fn restore(&mut self) {
        self.enabled = true;
        self.label = Self::LABEL;
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            enabled: true,
            label: Self::LABEL,
        }
    }
}

/// Form state plus the bound editor, built from one acquired form.
#[derive(Debug)]
pub struct SubmitPanel {
    tokens: AuthTokens,
    lang_options: Vec<LangOption>,
    problem_options: Vec<ProblemOption>,
    lang_id: Option<LangId>,
    problem_index: String,
    editor: Option<EditorAdapter>,
    mirror: SourceMirror,
    trigger: Trigger,
    state: SubmitState,
}

impl SubmitPanel {
    /// Language falls back from `preferred` to the remote selection, then to the first option.
    pub fn new(
        form: SubmitForm,
        target: &Target,
        preferred: Option<LangIdRef>,
        mirror: SourceMirror,
    ) -> Self {
        let (tokens, lang_options, problem_options) = form.into_parts();
        let lang_id = preferred
            .and_then(|id| lang_options.iter().find(|opt| opt.value == id))
            .or_else(|| lang_options.iter().find(|opt| opt.selected))
            .or_else(|| lang_options.first())
            .map(|opt| opt.value.clone());
        Self {
            tokens,
            lang_options,
            problem_options,
            lang_id,
            problem_index: target.problem_id().clone(),
            editor: None,
            mirror,
            trigger: Trigger::default(),
            state: SubmitState::Idle,
        }
    }

    pub fn tokens(&self) -> &AuthTokens {
        &self.tokens
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut AuthTokens {
        &mut self.tokens
    }

    pub(crate) fn replace_tokens(&mut self, tokens: AuthTokens) {
        self.tokens = tokens;
    }

    pub fn lang_options(&self) -> &[LangOption] {
        &self.lang_options
    }

    pub fn problem_options(&self) -> &[ProblemOption] {
        &self.problem_options
    }

    pub fn lang_id(&self) -> Option<LangIdRef> {
        self.lang_id.as_deref()
    }

    pub fn problem_index(&self) -> &str {
        &self.problem_index
    }

    /// Limits of the problem being submitted, if the remote form lists it.
    pub fn current_problem(&self) -> Option<&ProblemOption> {
        self.problem_options
            .iter()
            .find(|opt| opt.value == self.problem_index)
    }

    pub fn language_label(&self) -> Option<&str> {
        let lang_id = self.lang_id()?;
        self.lang_options
            .iter()
            .find(|opt| opt.value == lang_id)
            .map(|opt| opt.text.as_str())
    }

    /// Selects a language offered by the form. Returns false for unknown ids.
    pub fn select_language(&mut self, lang_id: LangIdRef) -> bool {
        if !self.lang_options.iter().any(|opt| opt.value == lang_id) {
            return false;
        }
        self.lang_id = Some(lang_id.to_owned());
        if let Some(editor) = self.editor.as_mut() {
            editor.set_language_mode(extension_hint(lang_id));
        }
        true
    }

    pub(crate) fn bind_editor(&mut self, editor: EditorAdapter) {
        self.editor = Some(editor);
    }

    pub fn editor(&self) -> Option<&EditorAdapter> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorAdapter> {
        self.editor.as_mut()
    }

    pub fn mirror(&self) -> &SourceMirror {
        &self.mirror
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub(crate) fn trigger_mut(&mut self) -> &mut Trigger {
        &mut self.trigger
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub(crate) fn set_state(&mut self, state: SubmitState) {
        self.state = state;
    }
}

impl fmt::Display for SubmitPanel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let limits = self
            .current_problem()
            .map(ProblemOption::limits_label)
            .unwrap_or_else(|| String::from("?"));
        writeln!(f, "Problem  : {} ({})", self.problem_index, limits)?;
        writeln!(
            f,
            "Language : {} {}",
            self.lang_id().unwrap_or("-"),
            self.language_label().unwrap_or("")
        )?;
        write!(
            f,
            "[{}]{}",
            self.trigger.label,
            if self.trigger.enabled { "" } else { " (disabled)" }
        )
    }
}

/// Slot the submission panel is mounted into.
#[derive(Debug, Default)]
pub struct PanelHost {
    panel: Option<SubmitPanel>,
}

impl PanelHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `panel`, removing the previous one first.
    pub fn mount(&mut self, panel: SubmitPanel) -> &mut SubmitPanel {
        self.remove();
        self.panel.get_or_insert(panel)
    }

    /// Removes the mounted panel. Returns false when there was none.
    pub fn remove(&mut self) -> bool {
        self.panel.take().is_some()
    }

    pub fn panel(&self) -> Option<&SubmitPanel> {
        self.panel.as_ref()
    }

    pub fn panel_mut(&mut self) -> Option<&mut SubmitPanel> {
        self.panel.as_mut()
    }

    pub fn mounted_count(&self) -> usize {
        self.panel.iter().count()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Url;

    use super::*;
    use crate::page::SubmitPage;
    use crate::testing::SUBMIT_PAGE;

    fn panel(preferred: Option<&str>, problem_url: &str) -> SubmitPanel {
        let form = SubmitPage::parse(SUBMIT_PAGE).extract_form().unwrap();
        let target = Target::classify(&Url::parse(problem_url).unwrap()).unwrap();
        SubmitPanel::new(form, &target, preferred, SourceMirror::new())
    }

    #[test]
    fn language_fallback_order() {
        let url = "https://codeforces.com/contest/1234/problem/A";
        assert_eq!(panel(Some("31"), url).lang_id(), Some("31"));
        assert_eq!(panel(Some("999"), url).lang_id(), Some("54"));
        assert_eq!(panel(None, url).lang_id(), Some("54"));

        let page = SubmitPage::parse(
            r#"<form class="submit-form"><select name="programTypeId">
            <option value="43">C</option><option value="31">Py</option>
            </select></form>"#,
        );
        let target = Target::classify(&Url::parse(url).unwrap()).unwrap();
        let form = page.extract_form().unwrap();
        let first = SubmitPanel::new(form, &target, None, SourceMirror::new());
        assert_eq!(first.lang_id(), Some("43"));

        let form = SubmitPage::parse(r#"<form class="submit-form"></form>"#)
            .extract_form()
            .unwrap();
        let none = SubmitPanel::new(form, &target, Some("54"), SourceMirror::new());
        assert_eq!(none.lang_id(), None);
    }

    #[test]
    fn select_language_and_limits() {
        let mut panel = panel(None, "https://codeforces.com/contest/1234/problem/B");
        assert!(panel.select_language("75"));
        assert_eq!(panel.language_label(), Some("Rust 1.75.0 (2021)"));
        assert!(!panel.select_language("1000"));
        assert_eq!(panel.lang_id(), Some("75"));

        let problem = panel.current_problem().unwrap();
        assert_eq!(problem.limits_label(), "2s, 512MB");
        assert_eq!(problem.input_file.as_deref(), Some("input.txt"));
        assert!(panel.to_string().contains("Problem  : B (2s, 512MB)"));
        assert!(panel.to_string().ends_with("[Submit]"));
    }

    #[test]
    fn host_keeps_at_most_one_panel() {
        let mut host = PanelHost::new();
        assert!(!host.remove());
        host.mount(panel(None, "https://codeforces.com/contest/1234/problem/A"));
        host.mount(panel(Some("31"), "https://codeforces.com/contest/1234/problem/A"));
        assert_eq!(host.mounted_count(), 1);
        assert_eq!(host.panel().unwrap().lang_id(), Some("31"));
        assert!(host.remove());
        assert!(!host.remove());
        assert_eq!(host.mounted_count(), 0);
    }

    #[test]
    fn trigger_labels() {
        let mut trigger = Trigger::default();
        assert!(trigger.is_enabled());
        trigger.disable();
        assert_eq!(trigger.label(), "Submitting...");
        assert!(!trigger.is_enabled());
        trigger.restore();
        assert_eq!(trigger.label(), "Submit");
    }
}
