use crate::models::ParsedQuery;

/// Splits `"<county>, <state> (<zip>)"` into its parts.
///
/// Returns `None` for any other shape, which callers treat as a free-text
/// query. Nothing about the zip or state is validated here; a well-shaped
/// query with a bogus zip simply matches no rows later on.
pub fn parse_term(term: &str) -> Option<ParsedQuery> {
    let (county, rest) = term.split_once(',')?;
    if rest.contains(',') {
        return None;
    }

    let (state, zip) = rest.trim().split_once('(')?;
    if zip.contains('(') {
        return None;
    }

    Some(ParsedQuery {
        county: county.trim().to_string(),
        state: state.trim().to_string(),
        zip: zip.replacen(')', "", 1).trim().to_string(),
    })
}
