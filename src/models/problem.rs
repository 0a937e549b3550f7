//! Data scraped from the listing page.

/// One problem on the listing page.
///
/// Numbers are unique within a listing; the parser keeps the first entry when
/// the site repeats one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemEntry {
    /// Position on the listing page, starting from 1.
    pub number: u32,
    /// Absolute URL of the canonical answer page.
    pub answer_link: String,
}

/// A link to a downloadable attachment found inside a problem body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentRef {
    /// Raw href/src value as it appears in the markup, usually site-relative.
    pub link: String,
    /// Visible label text, may be empty.
    pub label: String,
}

/// Cleaned problem statement plus its attachments.
#[derive(Clone, Debug, Default)]
pub struct Statement {
    /// Normalized text, paragraph breaks preserved as newlines.
    pub text: String,
    /// De-duplicated attachment links.
    pub attachments: Vec<AttachmentRef>,
}
