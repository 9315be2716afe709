use cffs_util::select;
use scraper::Html;

use crate::service::scrape::Scrape;

mod enter;
mod problem;
mod submit;

pub use enter::{EnterPage, EnterPageBuilder};
pub use problem::{ProblemPage, ProblemPageBuilder};
pub use submit::{AuthTokens, SubmitForm, SubmitPage, SubmitPageBuilder};

static LOGOUT_LABELS: &[&str] = &["Logout", "Выйти"];

pub trait HasHeader: Scrape {
    /// A logged in page carries a logout link in one of the site languages.
    fn is_logged_in(&self) -> bool {
        self.elem()
            .select(select!("a"))
            .any(|link| LOGOUT_LABELS.contains(&link.inner_text().trim()))
    }

    fn current_user(&self) -> Option<String> {
        if !self.is_logged_in() {
            return None;
        }
        self.find_first(select!(".lang-chooser a[href^=\"/profile/\"]"))
            .map(|elem| elem.inner_text().trim().to_owned())
    }
}

impl HasHeader for Html {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{LOGGED_OUT_PAGE, SUBMIT_PAGE};

    #[test]
    fn test_logged_in() {
        let page = Html::parse_document(SUBMIT_PAGE);
        assert!(page.is_logged_in());
        assert_eq!(page.current_user(), Some("tourist".to_owned()));

        let russian = Html::parse_document(r#"<a href="/x/logout">Выйти</a>"#);
        assert!(russian.is_logged_in());

        let page = Html::parse_document(LOGGED_OUT_PAGE);
        assert!(!page.is_logged_in());
        assert_eq!(page.current_user(), None);
    }
}
