/// Query parameter consulted when no `Authorization` header is present.
pub const AUTH_QUERY_PARAM: &str = "auth";

/// The only supported authorization scheme.
pub const SCHEME_BEARER: &str = "Bearer";
