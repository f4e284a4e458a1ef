//! Path parameters, `simple` style without explode.

use std::fmt::Display;
use std::str::FromStr;

use axum::extract::MatchedPath;
use axum::http::request::Parts;

use crate::binding::{percent_decode, ParamError};

/// Binds the path parameter `name` of the matched route.
///
/// The value is read from the raw request path rather than from the router's
/// captures, which are already leniently percent-decoded.
pub fn path_param<T>(parts: &Parts, name: &'static str) -> Result<T, ParamError>
where
    T: FromStr,
    T::Err: Display,
{
    let template = parts
        .extensions
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .ok_or(ParamError::Unbound { param: name })?;
    let raw = raw_segment(template, parts.uri.path(), name)
        .ok_or(ParamError::Unbound { param: name })?;

    bind_simple(name, raw)
}

/// Returns the still-encoded segment of `path` captured by `:name` in `template`.
pub fn raw_segment<'a>(template: &str, path: &'a str, name: &str) -> Option<&'a str> {
    let index = template
        .split('/')
        .position(|segment| segment.strip_prefix(':') == Some(name))?;
    path.split('/').nth(index)
}

/// `simple` style for a scalar: exactly one comma-separated value, strictly unescaped.
pub fn bind_simple<T>(name: &'static str, raw: &str) -> Result<T, ParamError>
where
    T: FromStr,
    T::Err: Display,
{
    let count = raw.split(',').count();
    if count > 1 {
        return Err(ParamError::TooManyValues { param: name, count });
    }

    let value = percent_decode(raw).map_err(|e| ParamError::invalid(name, e))?;
    value.parse::<T>().map_err(|e| ParamError::invalid(name, e))
}
