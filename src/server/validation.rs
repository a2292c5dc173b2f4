use crate::server::response::ApiError;

const MAX_SHOP_DOMAIN_LEN: usize = 255;
const MAX_SEARCH_QUERY_LEN: usize = 100;
const MIN_SEARCH_QUERY_LEN: usize = 2;

fn is_valid_domain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '.'
}

fn check_shop_domain(domain: &str) -> Result<(), String> {
    if domain.is_empty() {
        return Err("Shop domain cannot be empty".into());
    }
    if domain.len() > MAX_SHOP_DOMAIN_LEN {
        return Err(format!(
            "Shop domain cannot exceed {MAX_SHOP_DOMAIN_LEN} characters"
        ));
    }
    if !domain.chars().all(is_valid_domain_char) {
        return Err(
            "Shop domain can only contain alphanumeric characters, hyphens, and periods".into(),
        );
    }
    if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) {
        return Err("Shop domain cannot start or end with a hyphen or period".into());
    }
    Ok(())
}

/// Hostname-shaped shop domain, e.g. `acme.myshopify.com`.
pub fn validate_shop_domain(domain: &str) -> Result<(), ApiError> {
    check_shop_domain(domain).map_err(ApiError::bad_request)
}

/// Same check as [`validate_shop_domain`] for callers outside the HTTP layer.
pub fn shop_domain_problem(domain: &str) -> Option<String> {
    check_shop_domain(domain).err()
}

pub fn validate_number_of_days(days: i64) -> Result<(), ApiError> {
    if days <= 0 {
        return Err(ApiError::bad_request("number_of_days must be greater than 0"));
    }
    Ok(())
}

/// Trimmed query, or `None` when it is too short to search on.
pub fn search_term(query: &str) -> Result<Option<&str>, ApiError> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_QUERY_LEN {
        return Ok(None);
    }
    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ApiError::bad_request(format!(
            "search_query cannot exceed {MAX_SEARCH_QUERY_LEN} characters"
        )));
    }
    Ok(Some(query))
}
