//! Request-line routing for the light-show server.

use rgb_crossfade::ColorVector;
use rgb_crossfade::colors;
use std::time::Duration;

use crate::args::parse_period;

/// A parsed request.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// `GET /lightshow/<iterations>[/<period_secs>]`
    Lightshow {
        iterations: u32,
        period: Option<Duration>,
    },
    /// `GET /color/<name>`
    Color(ColorVector),
    /// `GET /cancel`
    Cancel,
    /// `GET /shutdown`
    Shutdown,
}

/// Why a request line was not routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Malformed request or argument (HTTP 400).
    BadRequest(String),
    /// No such route (HTTP 404).
    NotFound,
    /// Only GET is served (HTTP 405).
    MethodNotAllowed,
}

impl Route {
    /// Parses an HTTP request line such as `GET /lightshow/3 HTTP/1.1`.
    pub fn parse(request_line: &str) -> Result<Route, RouteError> {
        let mut parts = request_line.split_whitespace();
        let (Some(method), Some(target)) = (parts.next(), parts.next()) else {
            return Err(RouteError::BadRequest("malformed request line".into()));
        };
        if method != "GET" {
            return Err(RouteError::MethodNotAllowed);
        }

        let path = target.split('?').next().unwrap_or(target);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["lightshow", iterations] => Ok(Route::Lightshow {
                iterations: parse_iterations(iterations)?,
                period: None,
            }),
            ["lightshow", iterations, period] => Ok(Route::Lightshow {
                iterations: parse_iterations(iterations)?,
                period: Some(parse_period(period).map_err(RouteError::BadRequest)?),
            }),
            ["color", name] => colors::by_name(name)
                .map(Route::Color)
                .ok_or_else(|| RouteError::BadRequest(format!("unknown color `{name}`"))),
            ["cancel"] => Ok(Route::Cancel),
            ["shutdown"] => Ok(Route::Shutdown),
            _ => Err(RouteError::NotFound),
        }
    }
}

fn parse_iterations(value: &str) -> Result<u32, RouteError> {
    value
        .parse()
        .map_err(|_| RouteError::BadRequest(format!("`{value}` is not an iteration count")))
}
