use depot_core::{CleanupReport, CleanupStatus, FileRecord};

use super::schemas::{
    DeleteResponse, ErrorResponse, HealthResponse, ListFilesResponse, SettingsResponse,
    StatsResponse, UpdateSettingsRequest, UploadResponse,
};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Depot Storage API",
        version = "0.1.0",
        description = "HTTP API for the Depot archive storage service. Upload job archives, \
                       download them once, and let the cleanup policy reclaim the rest.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Files", description = "Archive upload, download, and lifecycle"),
        (name = "Cleanup", description = "Time-based cleanup sweeps"),
        (name = "Settings", description = "Cleanup policy settings"),
        (name = "Stats", description = "Storage statistics")
    ),
    paths(
        super::health::health,
        super::files::upload_raw,
        super::files::upload_multipart,
        super::files::download_file,
        super::files::check_file,
        super::files::delete_file,
        super::files::list_files,
        super::cleanup::run_cleanup,
        super::settings::get_settings,
        super::settings::update_settings,
        super::stats::get_stats,
    ),
    components(schemas(
        FileRecord, CleanupReport, CleanupStatus,
        HealthResponse, ErrorResponse,
        UploadResponse, DeleteResponse, ListFilesResponse,
        SettingsResponse, UpdateSettingsRequest, StatsResponse,
    ))
)]
pub struct ApiDoc;
