//! Service: registers endpoints and runs the request pipeline
//! decode -> validate input -> dispatch to handler -> validate output -> encode.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use schemagic_core::{Args, Dispatcher, Schema, Side, ValidationConfig, Validator};

use crate::registry::Module;
use crate::router::{normalize, RouteId, Router};
use crate::{Response, WebError};

/// Endpoint handler: receives the validated body as arguments, returns a JSON value or error.
pub type Handler = Box<dyn Fn(Args) -> Result<Value, WebError> + Send + Sync>;

/// Registered endpoint: rule plus the validators wrapped around its handler.
pub struct Endpoint {
    pub rule: String,
    input: Validator,
    output: Validator,
    handler: Handler,
}

impl Endpoint {
    pub fn input(&self) -> &Validator {
        &self.input
    }

    pub fn output(&self) -> &Validator {
        &self.output
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'a str>,
}

/// Body value -> handler arguments: mappings become keyword arguments, sequences positional
/// arguments, anything else (strings included) a single argument.
fn body_dispatcher() -> Dispatcher<Value, Args> {
    Dispatcher::<Value, Args>::new()
        .when(Value::is_string, |v| Args::from_positional([v]))
        .when(Value::is_array, |v| match v {
            Value::Array(items) => Args::from_positional(items),
            other => Args::from_positional([other]),
        })
        .when(Value::is_object, |v| match v {
            Value::Object(keyword) => Args::from_keyword(keyword),
            other => Args::from_positional([other]),
        })
        .otherwise(|v| Args::from_positional([v]))
}

/// Validated JSON endpoints, POST only. Validation mode and coercion come from the config.
pub struct Service {
    router: Router,
    endpoints: HashMap<RouteId, Endpoint>,
    next_route_id: u32,
    config: ValidationConfig,
    to_args: Dispatcher<Value, Args>,
}

impl Service {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            router: Router::new(),
            endpoints: HashMap::new(),
            next_route_id: 0,
            config,
            to_args: body_dispatcher(),
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Register an endpoint at `rule`. Missing schemas accept any value.
    pub fn route(
        &mut self,
        rule: &str,
        input_schema: Option<Schema>,
        output_schema: Option<Schema>,
        handler: impl Fn(Args) -> Result<Value, WebError> + Send + Sync + 'static,
    ) -> Result<RouteId, WebError> {
        let rule = normalize(rule);
        let id = RouteId(self.next_route_id);
        if !self.router.add("POST", &rule, id) {
            return Err(WebError::DuplicateRoute(rule));
        }
        self.next_route_id += 1;
        let input = Validator::new(input_schema, format!("input to endpoint /{}", rule), Side::Input)
            .config(&self.config);
        let output =
            Validator::new(output_schema, format!("output from endpoint /{}", rule), Side::Output)
                .config(&self.config);
        tracing::debug!(rule = %rule, input = %input.schema(), output = %output.schema(), "endpoint registered");
        self.endpoints.insert(
            id,
            Endpoint {
                rule,
                input,
                output,
                handler: Box::new(handler),
            },
        );
        Ok(id)
    }

    pub fn register(&mut self, module: &mut dyn Module) -> Result<(), WebError> {
        module.register_into(self)
    }

    pub fn endpoint(&self, id: RouteId) -> Option<&Endpoint> {
        self.endpoints.get(&id)
    }

    /// Run the pipeline and return the encoded output, or the error that stopped it.
    pub fn call(&self, method: &str, path: &str, body: &[u8]) -> Result<Vec<u8>, WebError> {
        let route_id = self
            .router
            .match_route(method, path)
            .ok_or_else(|| WebError::NotFound(format!("{} {}", method, path)))?;
        let endpoint = self
            .endpoints
            .get(&route_id)
            .ok_or_else(|| WebError::NotFound(format!("route_id {:?}", route_id)))?;

        let value: Value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(body)?
        };
        let input = endpoint.input.validate(value)?;
        let args = self.to_args.dispatch(input)?;
        let output = (endpoint.handler)(args)?;
        let output = endpoint.output.validate(output)?;
        Ok(serde_json::to_vec(&output)?)
    }

    /// Like `call`, with errors mapped to status codes and JSON error bodies.
    pub fn handle_request(&self, method: &str, path: &str, body: &[u8]) -> Response {
        match self.call(method, path, body) {
            Ok(body) => Response::json(200, body),
            Err(e) => {
                let status_code = e.status_code();
                tracing::warn!(method, path, status_code, error = %e, "request rejected");
                let kind = match &e {
                    WebError::Validation(v) => Some(v.kind()),
                    _ => None,
                };
                let body = serde_json::to_vec(&ErrorBody {
                    error: e.to_string(),
                    kind,
                })
                .unwrap_or_default();
                Response::json(status_code, body)
            }
        }
    }
}

impl Default for Service {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_shapes_map_to_arguments() {
        let d = body_dispatcher();
        assert_eq!(d.dispatch(json!("abc")).unwrap(), Args::new().arg("abc"));
        assert_eq!(d.dispatch(json!([1, 2])).unwrap(), Args::new().arg(1).arg(2));
        assert_eq!(
            d.dispatch(json!({"a": 1})).unwrap(),
            Args::new().kwarg("a", 1)
        );
        assert_eq!(d.dispatch(json!(5)).unwrap(), Args::new().arg(5));
        assert_eq!(d.dispatch(Value::Null).unwrap(), Args::new().arg(Value::Null));
    }
}
