//! Route matching module
//!
//! Routes are regular expressions over the request path, anchored at the
//! start and tried in registration order. The first match wins.

use crate::error::{BoxError, ConfigureError};
use crate::response::Response;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// What a handler returns
pub type HandlerResult = Result<Response, BoxError>;

/// Named captures of a matched route, in pattern order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Something a route can be bound to
pub trait Handler: Send + Sync {
    fn call(&self, params: &Params) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&Params) -> HandlerResult + Send + Sync,
{
    fn call(&self, params: &Params) -> HandlerResult {
        self(params)
    }
}

/// A pattern bound to a handler
#[derive(Clone)]
pub struct Route {
    pattern: Regex,
    captures: Vec<String>,
    handler: Arc<dyn Handler>,
}

impl Route {
    /// Compile `pattern`, prefixing `^` when it is not already anchored
    pub fn new(pattern: &str, handler: Arc<dyn Handler>) -> Result<Self, ConfigureError> {
        let anchored = if pattern.starts_with('^') {
            pattern.to_string()
        } else {
            format!("^{pattern}")
        };
        let pattern = Regex::new(&anchored).map_err(|source| ConfigureError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let captures = pattern.capture_names().flatten().map(String::from).collect();

        Ok(Self {
            pattern,
            captures,
            handler,
        })
    }

    /// The anchored pattern
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Names of the capture groups handed to the handler
    pub fn capture_names(&self) -> &[String] {
        &self.captures
    }

    fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.pattern.captures(path)?;
        let params = self
            .captures
            .iter()
            .filter_map(|name| {
                caps.name(name)
                    .map(|value| (name.clone(), value.as_str().to_string()))
            })
            .collect();
        Some(Params(params))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("captures", &self.captures)
            .finish_non_exhaustive()
    }
}

/// A successful lookup
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Params,
}

impl RouteMatch<'_> {
    pub fn invoke(&self) -> HandlerResult {
        self.route.handler.call(&self.params)
    }
}

/// Ordered route collection
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<(), ConfigureError> {
        self.routes.push(Route::new(pattern, Arc::new(handler))?);
        Ok(())
    }

    /// Find the first route matching `path`.
    ///
    /// The path is tried as given and then, if it does not already end in
    /// `/`, once more with a `/` appended. `None` means no route applies.
    pub fn find(&self, path: &str) -> Option<RouteMatch<'_>> {
        if let Some(found) = self.first_match(path) {
            return Some(found);
        }
        if path.ends_with('/') {
            return None;
        }
        self.first_match(&format!("{path}/"))
    }

    fn first_match(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| {
            route
                .captures(path)
                .map(|params| RouteMatch { route, params })
        })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
