//! ServiceRegistry: a group of endpoints under a shared prefix, attached via Service::register.

use serde_json::Value;

use schemagic_core::{Args, Schema};

use crate::service::{Handler, Service};
use crate::WebError;

/// Anything that can register endpoints into a Service.
pub trait Module {
    fn register_into(&mut self, service: &mut Service) -> Result<(), WebError>;
}

/// One endpoint waiting to be registered. `rule` is already joined with the registry prefix.
pub struct ServiceDefinition {
    pub rule: String,
    pub input_schema: Option<Schema>,
    pub output_schema: Option<Schema>,
    pub handler: Handler,
}

pub struct ServiceRegistry {
    pub prefix: String,
    definitions: Vec<ServiceDefinition>,
}

impl ServiceRegistry {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            definitions: Vec::new(),
        }
    }

    /// Add an endpoint. `rule` is relative to the registry prefix.
    pub fn endpoint(
        mut self,
        rule: &str,
        input_schema: Option<Schema>,
        output_schema: Option<Schema>,
        handler: impl Fn(Args) -> Result<Value, WebError> + Send + Sync + 'static,
    ) -> Self {
        let rule = format!(
            "{}/{}",
            self.prefix.trim_end_matches('/'),
            rule.trim_start_matches('/')
        );
        self.definitions.push(ServiceDefinition {
            rule,
            input_schema,
            output_schema,
            handler: Box::new(handler),
        });
        self
    }

    pub fn definitions(&self) -> &[ServiceDefinition] {
        &self.definitions
    }
}

impl Module for ServiceRegistry {
    fn register_into(&mut self, service: &mut Service) -> Result<(), WebError> {
        for def in self.definitions.drain(..) {
            service.route(&def.rule, def.input_schema, def.output_schema, def.handler)?;
        }
        Ok(())
    }
}
