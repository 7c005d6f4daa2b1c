//! Decision logic for viewing and editing wiki pages.
//!
//! Pure functions: the handlers look the page up, ask here what to do, and
//! only then touch the store. Keeping the decisions free of I/O is what
//! makes the read/edit/redirect table testable without a database.

/// What a view request on a title should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewDecision {
    /// Page exists: render it. The edit affordance is only offered to
    /// logged-in users.
    Render { editable: bool },
    /// Logged-in user hit a missing page: send them to the edit form.
    RedirectToEdit,
    /// Anonymous user hit a missing page: send them home.
    RedirectHome,
}

/// What an edit submission on a title should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditDecision {
    /// Empty content never reaches the store; re-render the form with a
    /// validation error so an empty submission cannot clear an existing
    /// page.
    RejectEmpty,
    /// Full-replace the existing page text and refresh its timestamp.
    Update,
    /// First submission for this title.
    Create,
}

#[must_use]
pub fn view_decision(authenticated: bool, page_exists: bool) -> ViewDecision {
    if page_exists {
        ViewDecision::Render {
            editable: authenticated,
        }
    } else if authenticated {
        ViewDecision::RedirectToEdit
    } else {
        ViewDecision::RedirectHome
    }
}

#[must_use]
pub fn edit_decision(content: &str, page_exists: bool) -> EditDecision {
    // Validation comes before any store interaction
    if content.trim().is_empty() {
        EditDecision::RejectEmpty
    } else if page_exists {
        EditDecision::Update
    } else {
        EditDecision::Create
    }
}
