//! Text responses rendered from captured parameters.

use axum::body::Body;
use axum::http::Request;
use axum::response::IntoResponse;

use crate::http::handler::{BoxResponseFuture, Handler};
use crate::routing::ParamKey;

/// Responds with a body template where `{name}` is replaced by the
/// parameter captured under `name`.
///
/// Unknown names render as empty text. Braces that do not enclose a name
/// are written as-is.
#[derive(Debug, Clone)]
pub struct TextResponder {
    template: String,
    params: ParamKey,
}

impl TextResponder {
    pub fn new(template: impl Into<String>, params: ParamKey) -> Self {
        Self {
            template: template.into(),
            params,
        }
    }

    pub fn render<B>(&self, req: &Request<B>) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if is_name(&after[..close]) => {
                    out.push_str(self.params.value(req, &after[..close]));
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl Handler for TextResponder {
    fn call(&self, req: Request<Body>) -> BoxResponseFuture {
        let body = self.render(&req);
        Box::pin(async move { body.into_response() })
    }
}
