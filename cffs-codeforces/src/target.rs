use std::fmt;

use cffs_util::regex;
use getset::Getters;
use reqwest::Url;
use serde::Serialize;

use crate::error::SubmitError;

/// Site area a problem page belongs to.
#[derive(
    Serialize, EnumString, IntoStaticStr, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TargetKind {
    Contest,
    Gym,
    Problemset,
    Group,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.into())
    }
}

/// Where and what to submit, as classified from a problem page address.
#[derive(Serialize, Getters, Debug, Clone, PartialEq, Eq)]
#[get = "pub"]
pub struct Target {
    kind: TargetKind,
    #[serde(serialize_with = "serialize_url")]
    page_url: Url,
    #[serde(serialize_with = "serialize_url")]
    endpoint: Url,
    problem_id: String,
    contest_id: String,
    participant_id: Option<String>,
    group_id: Option<String>,
}

impl Target {
    /// Classifies a problem page address.
    ///
    /// Patterns are tried in a fixed order: problemset, group, then contest/gym.
    /// An index `0` is the site's name for the first problem and becomes `A`.
    pub fn classify(page_url: &Url) -> Result<Self, SubmitError> {
        Self::from_path(page_url, page_url.path())
            .ok_or_else(|| SubmitError::Classification(page_url.to_string()))
    }

    fn from_path(page_url: &Url, path: &str) -> Option<Self> {
        let (kind, group_id, contest_id, problem_id) = if path.starts_with("/problemset/") {
            let caps = regex!(r"^/problemset/problem/([^/]+)/([^/]*)/?$").captures(path)?;
            (TargetKind::Problemset, None, caps[1].to_owned(), caps[2].to_owned())
        } else if path.starts_with("/group/") {
            let caps =
                regex!(r"^/group/([^/]+)/contest/([^/]+)/problem/([^/]*)/?$").captures(path)?;
            (
                TargetKind::Group,
                Some(caps[1].to_owned()),
                caps[2].to_owned(),
                caps[3].to_owned(),
            )
        } else {
            let caps = regex!(r"^/(contest|gym)/([^/]+)/problem/([^/]*)/?$").captures(path)?;
            let kind = if &caps[1] == "gym" {
                TargetKind::Gym
            } else {
                TargetKind::Contest
            };
            (kind, None, caps[2].to_owned(), caps[3].to_owned())
        };

        let problem_id = match problem_id.as_str() {
            "" => return None,
            "0" => "A".to_owned(),
            _ => problem_id,
        };
        let endpoint_path = match (kind, &group_id) {
            (TargetKind::Problemset, _) => "/problemset/submit".to_owned(),
            (TargetKind::Group, Some(group_id)) => {
                format!("/group/{}/contest/{}/submit", group_id, contest_id)
            }
            _ => format!("/{}/{}/submit", kind, contest_id),
        };
        let mut endpoint = page_url.clone();
        endpoint.set_path(&endpoint_path);
        endpoint.set_query(None);
        endpoint.set_fragment(None);

        Some(Self {
            kind,
            page_url: page_url.clone(),
            endpoint,
            problem_id,
            contest_id,
            participant_id: None,
            group_id,
        })
    }

    /// Problem code used by the problemset form, e.g. `1234A`.
    pub fn problem_code(&self) -> String {
        format!("{}{}", self.contest_id, self.problem_id)
    }

    pub(crate) fn set_contest_id(&mut self, contest_id: String) {
        self.contest_id = contest_id;
    }

    pub(crate) fn set_participant_id(&mut self, participant_id: String) {
        self.participant_id = Some(participant_id);
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} problem {} ({})",
            self.kind, self.contest_id, self.problem_id, self.endpoint
        )
    }
}

fn serialize_url<S: serde::Serializer>(url: &Url, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(url)
}

/// Whether a page can host the submission panel.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PageStatus {
    Active,
    NavigateToProblem,
    NotCodeforces,
}

impl PageStatus {
    const HOST: &'static str = "codeforces.com";

    pub fn of(url: &Url) -> Self {
        let is_codeforces = url
            .host_str()
            .map(|host| host == Self::HOST || host.ends_with(&format!(".{}", Self::HOST)))
            .unwrap_or(false);
        if !is_codeforces {
            Self::NotCodeforces
        } else if Target::classify(url).is_ok() {
            Self::Active
        } else {
            Self::NavigateToProblem
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Self::Active => "Active on this page",
            Self::NavigateToProblem => "Navigate to a problem page",
            Self::NotCodeforces => "Not on Codeforces",
        };
        f.write_str(msg)
    }
}

#[cfg(test)]
mod tests {
    use cffs_util::assert_matches;

    use super::*;

    fn classify(s: &str) -> Result<Target, SubmitError> {
        Target::classify(&Url::parse(s).unwrap())
    }

    #[test]
    fn classify_contest() -> anyhow::Result<()> {
        let target = classify("https://codeforces.com/contest/1234/problem/A")?;
        assert_eq!(target.kind(), &TargetKind::Contest);
        assert_eq!(target.contest_id(), "1234");
        assert_eq!(target.problem_id(), "A");
        assert_eq!(target.group_id(), &None);
        assert_eq!(
            target.endpoint().as_str(),
            "https://codeforces.com/contest/1234/submit"
        );
        Ok(())
    }

    #[test]
    fn classify_problemset_normalizes_zero() -> anyhow::Result<()> {
        let target = classify("https://codeforces.com/problemset/problem/1234/0")?;
        assert_eq!(target.kind(), &TargetKind::Problemset);
        assert_eq!(target.contest_id(), "1234");
        assert_eq!(target.problem_id(), "A");
        assert_eq!(target.problem_code(), "1234A");
        assert_eq!(
            target.endpoint().as_str(),
            "https://codeforces.com/problemset/submit"
        );
        Ok(())
    }

    #[test]
    fn classify_group_and_gym() -> anyhow::Result<()> {
        let target = classify("https://codeforces.com/group/AbCd12/contest/345678/problem/0/")?;
        assert_eq!(target.kind(), &TargetKind::Group);
        assert_eq!(target.group_id(), &Some("AbCd12".to_owned()));
        assert_eq!(target.contest_id(), "345678");
        assert_eq!(target.problem_id(), "A");
        assert_eq!(
            target.endpoint().as_str(),
            "https://codeforces.com/group/AbCd12/contest/345678/submit"
        );

        let target = classify("https://codeforces.com/gym/100001/problem/B2?locale=ru#top")?;
        assert_eq!(target.kind(), &TargetKind::Gym);
        assert_eq!(target.problem_id(), "B2");
        assert_eq!(
            target.endpoint().as_str(),
            "https://codeforces.com/gym/100001/submit"
        );
        Ok(())
    }

    #[test]
    fn zero_index_always_normalized() -> anyhow::Result<()> {
        for url in &[
            "https://codeforces.com/contest/1/problem/0",
            "https://codeforces.com/gym/2/problem/0",
            "https://codeforces.com/problemset/problem/3/0",
            "https://codeforces.com/group/g/contest/4/problem/0",
        ] {
            assert_eq!(classify(url)?.problem_id(), "A");
        }
        Ok(())
    }

    #[test]
    fn classify_failures() {
        for url in &[
            "https://codeforces.com/",
            "https://codeforces.com/contest/1234",
            "https://codeforces.com/contest/1234/problem/",
            "https://codeforces.com/problemset/status",
            "https://codeforces.com/problemset/problem/1234",
            "https://codeforces.com/group/g/contest/4/status",
            "https://codeforces.com/blog/entry/1/problem/A",
        ] {
            assert_matches!(classify(url) => Err(SubmitError::Classification(_)));
        }
    }

    #[test]
    fn page_status() {
        let status = |s: &str| PageStatus::of(&Url::parse(s).unwrap());
        assert_eq!(
            status("https://codeforces.com/contest/1/problem/A"),
            PageStatus::Active
        );
        assert_eq!(
            status("https://mirror.codeforces.com/problemset/problem/1/A"),
            PageStatus::Active
        );
        assert_eq!(
            status("https://codeforces.com/contests"),
            PageStatus::NavigateToProblem
        );
        assert_eq!(
            status("https://example.com/contest/1/problem/A"),
            PageStatus::NotCodeforces
        );
    }
}
