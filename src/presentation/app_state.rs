// Application state for HTTP handlers
use crate::application::ingest_service::IngestService;
use crate::application::query_service::QueryService;
use crate::application::task_service::TaskService;

#[derive(Clone)]
pub struct AppState {
    pub ingest_service: IngestService,
    pub query_service: QueryService,
    pub task_service: TaskService,
}
