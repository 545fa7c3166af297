//! Project scoping for user-authored JQL.
//!
//! Queries are stored exactly as the user typed them and rescoped at every
//! use, so a later change to the project key retroactively rescopes every
//! view without any migration of stored queries.

/// Split a query on the first case-insensitive `ORDER BY` keyword.
/// Plain textual split: no quote or escape awareness.
fn split_order_by(jql: &str) -> (&str, Option<&str>) {
    let needle = b"order by";
    let pos = jql
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle));
    match pos {
        Some(pos) => (&jql[..pos], Some(&jql[pos..])),
        None => (jql, None),
    }
}

/// Rewrite a query so it is constrained to one project.
///
/// `"status = Open"` becomes `"(status = Open) AND project = PROJ"`; an empty
/// conditions clause becomes `"project = PROJ"`; an `ORDER BY` clause is
/// re-appended after the scoped conditions. Applying this to an already
/// scoped query wraps it again; the function always wraps, and callers only
/// ever scope the stored, unscoped form.
pub fn scope_to_project(jql: &str, project: &str) -> String {
    let (conditions, ordering) = split_order_by(jql);
    let conditions = conditions.trim();

    let scoped = if conditions.is_empty() {
        format!("project = {}", project)
    } else {
        format!("({}) AND project = {}", conditions, project)
    };

    match ordering {
        Some(ordering) => format!("{} {}", scoped, ordering),
        None => scoped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_conditions_and_appends_project() {
        assert_eq!(
            scope_to_project("status = Open", "PROJ"),
            "(status = Open) AND project = PROJ"
        );
    }

    #[test]
    fn order_by_clause_is_reappended() {
        assert_eq!(
            scope_to_project("status = Open ORDER BY created DESC", "PROJ"),
            "(status = Open) AND project = PROJ ORDER BY created DESC"
        );
    }

    #[test]
    fn empty_query_becomes_bare_project_constraint() {
        assert_eq!(scope_to_project("", "PROJ"), "project = PROJ");
    }

    #[test]
    fn order_by_only_query_keeps_its_ordering() {
        assert_eq!(
            scope_to_project("ORDER BY updated", "PROJ"),
            "project = PROJ ORDER BY updated"
        );
    }

    #[test]
    fn order_by_match_is_case_insensitive() {
        assert_eq!(
            scope_to_project("resolution = empty order by rank", "PROJ"),
            "(resolution = empty) AND project = PROJ order by rank"
        );
    }

    #[test]
    fn double_scoping_wraps_again() {
        // Known property: the transform always wraps, so scoping twice
        // nests the constraint rather than detecting it.
        let once = scope_to_project("status = Open", "PROJ");
        assert_eq!(
            scope_to_project(&once, "PROJ"),
            "((status = Open) AND project = PROJ) AND project = PROJ"
        );
    }
}
