//! Fixed-body route handler
//!
//! Used for routes declared in the configuration file. `{name}` in the body is
//! replaced by the HTML-escaped named capture `name`; unknown placeholders are
//! left as written.

use super::file_server::escape_html;
use crate::response::Response;
use crate::routing::{Handler, HandlerResult, Params};

#[derive(Debug, Clone)]
pub struct TemplateHandler {
    body: String,
}

impl TemplateHandler {
    pub const fn new(body: String) -> Self {
        Self { body }
    }

    pub fn render(&self, params: &Params) -> String {
        let mut out = String::with_capacity(self.body.len());
        let mut rest = self.body.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after
                .find('}')
                .and_then(|close| params.get(&after[..close]).map(|v| (close, v)));
            match value {
                Some((close, value)) => {
                    out.push_str(&escape_html(value));
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl Handler for TemplateHandler {
    fn call(&self, params: &Params) -> HandlerResult {
        Ok(Response::Html(self.render(params)))
    }
}
