//! OpenAPI documentation and schema generation
//!
//! Uses utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the guest-toolhub REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "guest-toolhub REST API",
        version = "0.1.0",
        description = "Combine guest account files into one credential list and look up player ban status",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:6789", description = "Local development server")
    ),
    paths(
        // Ban Check
        crate::api::routes::check_ban,

        // Combine
        crate::api::routes::combine_files,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::ParsedRecord,
        crate::types::FailureKind,
        crate::types::InputFailure,
        crate::types::BatchResult,
        crate::types::BanVerdict,
        crate::types::BanStatus,
        crate::types::Event,

        // Config types from config.rs
        crate::config::Config,
        crate::config::CombinerConfig,
        crate::config::FileCollisionAction,
        crate::config::BanCheckConfig,
        crate::config::ServerIntegrationConfig,
        crate::config::ApiConfig,

        // API request/response types from routes
        crate::api::routes::CheckQuery,
        crate::api::routes::BanCheckResponse,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "ban-check", description = "Ban check - Look up whether a player account is banned"),
        (name = "combine", description = "Combine - Merge guest account files into combined_guest.json"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec, events"),
    )
)]
pub struct ApiDoc;
