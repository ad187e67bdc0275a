//! Shared engine context threaded through workers, hooks, and the CLI.

use std::sync::Arc;

use vf_av::Encoder;
use vf_core::config::Config;
use vf_core::events::EventBus;
use vf_core::VideoStore;

use crate::pipeline::MediaLayout;
use crate::queue::JobQueue;

/// Bundles every service the engine needs to run conversions.
#[derive(Clone)]
pub struct EngineContext {
    pub store: Arc<dyn VideoStore>,
    pub queue: Arc<dyn JobQueue>,
    pub encoder: Arc<dyn Encoder>,
    pub events: Arc<EventBus>,
    pub layout: MediaLayout,
    pub config: Arc<Config>,
}
