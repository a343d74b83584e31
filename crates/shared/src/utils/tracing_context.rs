use tokio::time::Instant;
use tracing::{Span, info, info_span};

/// A span plus the clock for one service operation.
pub struct TracingContext {
    pub span: Span,
    pub start_time: Instant,
}

impl TracingContext {
    pub fn start(component: &'static str, operation: &'static str) -> Self {
        let span = info_span!("operation", component, operation);
        span.in_scope(|| info!("Starting operation: {operation}"));

        Self {
            span,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}
