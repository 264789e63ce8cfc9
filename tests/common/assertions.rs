//! Domain-specific assertion macros for ppl harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that name the
//! picker invariant that was violated.

/// Assert the emails of a person slice, in order.
///
/// ```rust
/// assert_emails!(picker.results(), ["ada@example.com", "alan@example.com"]);
/// ```
#[macro_export]
macro_rules! assert_emails {
    ($people:expr, [$($email:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $people.iter().map(|p| p.email.as_str()).collect();
        let expected: Vec<&str> = vec![$($email),*];
        pretty_assertions::assert_eq!(actual, expected, "emails differ");
    }};
}

/// Assert that no email appears twice in the selection.
#[macro_export]
macro_rules! assert_selection_unique {
    ($picker:expr) => {{
        let sel = $picker.selection();
        let mut seen = std::collections::HashSet::new();
        for p in sel.iter() {
            if !seen.insert(p.email.as_str()) {
                panic!(
                    "assert_selection_unique! failed: {:?} selected twice in {:?}",
                    p.email,
                    sel.iter().map(|p| p.email.as_str()).collect::<Vec<_>>()
                );
            }
        }
    }};
}

/// Assert that no visible result is already selected.
#[macro_export]
macro_rules! assert_results_disjoint {
    ($picker:expr) => {{
        let picker = &$picker;
        for p in picker.results() {
            if picker.selection().contains_email(&p.email) {
                panic!(
                    "assert_results_disjoint! failed: {:?} is both selected and a result",
                    p.email
                );
            }
        }
    }};
}
