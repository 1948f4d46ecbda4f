use async_trait::async_trait;
use duet_application::{GatewayError, GatewayResponse, GenerationRequest, ModelGateway};
use duet_domain::ModelFamily;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Dispatches each request to the adapter registered for its model family.
#[derive(Default)]
pub struct RoutingGateway {
    adapters: HashMap<ModelFamily, Arc<dyn ModelGateway>>,
}

impl RoutingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adapter(mut self, family: ModelFamily, adapter: Arc<dyn ModelGateway>) -> Self {
        self.adapters.insert(family, adapter);
        self
    }
}

#[async_trait]
impl ModelGateway for RoutingGateway {
    async fn generate(&self, request: &GenerationRequest) -> GatewayResponse {
        let family = request.model.family();
        match self.adapters.get(&family) {
            Some(adapter) => {
                debug!("Routing {} to {} adapter", request.model, family);
                adapter.generate(request).await
            }
            None => GatewayResponse::failure(
                GatewayError::ModelNotAvailable(format!(
                    "no provider configured for {} ({})",
                    request.model, family
                )),
                0,
            ),
        }
    }
}
