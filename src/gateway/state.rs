use std::sync::Arc;

use crate::engine::GradingEngine;

#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<GradingEngine>,
}

impl GatewayState {
    pub fn new(engine: Arc<GradingEngine>) -> Self {
        Self { engine }
    }
}
