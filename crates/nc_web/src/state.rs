use std::sync::Arc;
use crate::pipeline::PodcastPipeline;

pub struct AppState {
    pub pipeline: Arc<PodcastPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<PodcastPipeline>) -> Self {
        Self { pipeline }
    }
}
