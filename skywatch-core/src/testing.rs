use std::sync::Arc;

use tokio::sync::Notify;
use wiremock::{Request, Respond, ResponseTemplate};

/// Answers with `template`, notifying `arrived` the moment a request lands and
/// before any configured delay runs.
pub(crate) struct SignalOnArrival {
    pub arrived: Arc<Notify>,
    pub template: ResponseTemplate,
}

impl Respond for SignalOnArrival {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrived.notify_one();
        self.template.clone()
    }
}
