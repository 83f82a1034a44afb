use getset::{CopyGetters, Getters};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISSUE_HREF: Regex =
        Regex::new(r"([^/]+)/([^/]+)/(issues|pulls)/([0-9]+)").unwrap();
}

/// Kind of unit an issue-like link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Issue,
    Pull,
}

/// Owner, repository and index parsed from an issue or pull-request link.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct IssueRef {
    #[get = "pub"]
    owner: String,
    #[get = "pub"]
    repo: String,
    #[get_copy = "pub"]
    kind: IssueKind,
    #[get_copy = "pub"]
    index: u64,
}

/// Parses an href like `/owner/repo/issues/42`.
///
/// Query strings and fragments are ignored, so anchors into a comment
/// thread still resolve to the issue itself.
pub fn parse_issue_href(href: &str) -> Option<IssueRef> {
    let path = href
        .split(|c: char| c == '#' || c == '?')
        .next()
        .unwrap_or_default();
    let captures = ISSUE_HREF.captures(path)?;
    let kind = match &captures[3] {
        "issues" => IssueKind::Issue,
        _ => IssueKind::Pull,
    };
    Some(IssueRef {
        owner: captures[1].to_string(),
        repo: captures[2].to_string(),
        kind,
        index: captures[4].parse().ok()?,
    })
}
